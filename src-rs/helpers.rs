use std::env;

pub fn env_or(key: &str, fallback: &str) -> String {
    env_opt(key).unwrap_or_else(|| fallback.to_string())
}

pub fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

pub fn env_bool(key: &str, fallback: bool) -> bool {
    match env_opt(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => fallback,
        },
        None => fallback,
    }
}

/// Replaces a stored key with a fixed marker so it is never echoed back.
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        "***".to_string()
    }
}
