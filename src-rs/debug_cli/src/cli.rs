use std::env;

use crate::models::CLIConfig;

const DEFAULT_URL: &str = "http://localhost:8002";
const DEFAULT_LANGUAGE: &str = "zh-CN";
const DEFAULT_DETAIL: &str = "standard";

pub fn parse_config() -> CLIConfig {
    let mut cfg = CLIConfig {
        base_url: env_or("MATH_SERVER_URL", DEFAULT_URL.to_string()),
        language: env_or("MATH_SERVER_LANG", DEFAULT_LANGUAGE.to_string()),
        detail_level: env_or("MATH_SERVER_DETAIL", DEFAULT_DETAIL.to_string()),
        timeout: env_parse("MATH_SERVER_TIMEOUT", 10),
        poll_interval_ms: env_parse("MATH_SERVER_POLL_MS", 250),
        max_polls: env_parse("MATH_SERVER_MAX_POLLS", 240),
    };

    let args: Vec<String> = env::args().collect();
    let mut idx = 1;
    while idx < args.len() {
        let value = args.get(idx + 1);
        match (args[idx].as_str(), value) {
            ("--base", Some(value)) => {
                cfg.base_url = value.clone();
                idx += 1;
            }
            ("--lang", Some(value)) => {
                cfg.language = value.clone();
                idx += 1;
            }
            ("--detail", Some(value)) => {
                cfg.detail_level = value.clone();
                idx += 1;
            }
            ("--timeout", Some(value)) => {
                if let Ok(parsed) = value.parse::<u64>() {
                    cfg.timeout = parsed;
                }
                idx += 1;
            }
            _ => {}
        }
        idx += 1;
    }

    cfg
}

fn env_or(key: &str, fallback: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(fallback)
}
