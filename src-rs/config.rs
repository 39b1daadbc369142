//! Server configuration: built-in defaults, then an optional TOML file, then
//! environment variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helpers::{env_bool, env_opt, env_or, mask_key};
use crate::llm::settings::{AiConfig, DEFAULT_TIMEOUT_SECS};

pub const CONFIG_PATH_ENV: &str = "MATH_SERVER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    pub api_base: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiFileSettings {
    pub default_service: String,
    pub timeout_secs: u64,
    pub services: BTreeMap<String, ServiceSettings>,
}

impl Default for AiFileSettings {
    fn default() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            "deepseek".to_string(),
            ServiceSettings {
                api_base: "https://api.deepseek.com".to_string(),
                model: "deepseek-chat".to_string(),
                description: "DeepSeek chat".to_string(),
                api_key: String::new(),
            },
        );
        Self {
            default_service: "deepseek".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            services,
        }
    }
}

impl AiFileSettings {
    pub fn default_service(&self) -> Option<&ServiceSettings> {
        self.services.get(&self.default_service)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub name_en: String,
    pub version: String,
    pub description: String,
    pub supported_languages: Vec<String>,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "小学数学题目生成器".to_string(),
            name_en: "Primary School Math Question Generator".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: String::new(),
            supported_languages: vec!["zh-CN".to_string(), "en-US".to_string()],
        }
    }
}

/// One selectable operation type or knowledge point.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DifficultyLevel {
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
}

/// Question-generation catalogs. Difficulty levels are keyed by their
/// numeric level written as a string.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MathCatalog {
    pub operation_types: Vec<CatalogEntry>,
    pub knowledge_points: Vec<CatalogEntry>,
    pub difficulty_levels: BTreeMap<String, DifficultyLevel>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppLicense {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub text: String,
}

impl Default for AppLicense {
    fn default() -> Self {
        Self {
            name: "MIT License".to_string(),
            url: "https://opensource.org/licenses/MIT".to_string(),
            text: String::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DependencyLicense {
    pub name: String,
    pub license: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub url: String,
}

/// Dependencies are grouped by component, e.g. `frontend` and `backend`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Licenses {
    pub app_license: AppLicense,
    pub dependencies: BTreeMap<String, Vec<DependencyLicense>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub log_level: String,
    pub log_json: bool,
    pub cors_origins: Vec<String>,
    pub app: AppInfo,
    pub math_generation: MathCatalog,
    pub licenses: Licenses,
    pub ai: AiFileSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8002".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            cors_origins: Vec::new(),
            app: AppInfo::default(),
            math_generation: MathCatalog::default(),
            licenses: Licenses::default(),
            ai: AiFileSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the file named by `MATH_SERVER_CONFIG` (or the default path) and
    /// applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env_or(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH);
        let mut cfg = Self::from_file(Path::new(&path))?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: display, source })
    }

    pub fn apply_env(&mut self) {
        if let Some(bind) = env_opt("MATH_SERVER_BIND") {
            self.bind_address = bind;
        }
        if let Some(level) = env_opt("MATH_SERVER_LOG") {
            self.log_level = level;
        }
        self.log_json = env_bool("MATH_SERVER_LOG_JSON", self.log_json);
        if let Some(origins) = env_opt("MATH_SERVER_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// A copy that is safe to serve: stored service keys are masked.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        for service in cfg.ai.services.values_mut() {
            service.api_key = mask_key(&service.api_key);
        }
        cfg
    }

    /// The default provider configuration: `AI_API_BASE`, `AI_API_KEY` and
    /// `AI_MODEL` win over the file's default service.
    pub fn default_ai_config(&self) -> AiConfig {
        let service = self.ai.default_service();
        AiConfig {
            api_base: env_opt("AI_API_BASE")
                .or_else(|| service.map(|s| s.api_base.clone()))
                .unwrap_or_else(|| "https://api.deepseek.com".to_string()),
            api_key: env_opt("AI_API_KEY")
                .or_else(|| service.map(|s| s.api_key.clone()))
                .unwrap_or_default(),
            model: env_opt("AI_MODEL")
                .or_else(|| service.map(|s| s.model.clone()))
                .unwrap_or_else(|| "deepseek-chat".to_string()),
            timeout: self.ai.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.ai.default_service().unwrap().model, "deepseek-chat");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
bind_address = "127.0.0.1:9000"
cors_origins = ["http://localhost:5173"]

[ai]
default_service = "local"
timeout_secs = 12

[ai.services.local]
api_base = "http://localhost:11434"
model = "qwen2"
"#
        )
        .unwrap();

        let cfg = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.bind_address, "127.0.0.1:9000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(cfg.ai.timeout_secs, 12);
        let service = cfg.ai.default_service().unwrap();
        assert_eq!(service.api_base, "http://localhost:11434");
        assert!(service.api_key.is_empty());
    }

    #[test]
    fn catalogs_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[app]
version = "2.1.0"

[[math_generation.operation_types]]
id = "addition"
name = "加法"
name_en = "Addition"

[math_generation.difficulty_levels.1]
name = "简单"

[licenses.app_license]
name = "MIT License"
url = "https://opensource.org/licenses/MIT"

[[licenses.dependencies.backend]]
name = "axum"
license = "MIT"
"#
        )
        .unwrap();

        let cfg = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.app.version, "2.1.0");
        assert_eq!(cfg.app.supported_languages, vec!["zh-CN", "en-US"]);
        assert_eq!(cfg.math_generation.operation_types[0].name_en, "Addition");
        assert!(cfg.math_generation.knowledge_points.is_empty());
        assert_eq!(cfg.math_generation.difficulty_levels["1"].name, "简单");
        assert_eq!(cfg.licenses.dependencies["backend"][0].name, "axum");
    }

    #[test]
    fn shipped_config_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/app.toml");
        let cfg = ServerConfig::from_file(&path).unwrap();
        assert!(!cfg.math_generation.operation_types.is_empty());
        assert!(!cfg.math_generation.knowledge_points.is_empty());
        assert_eq!(cfg.math_generation.difficulty_levels.len(), 5);
        assert!(cfg.ai.default_service().is_some());
    }

    #[test]
    fn redacted_copy_masks_service_keys() {
        let mut cfg = ServerConfig::default();
        if let Some(service) = cfg.ai.services.get_mut("deepseek") {
            service.api_key = "sk-secret".to_string();
        }
        let redacted = cfg.redacted();
        assert_eq!(redacted.ai.services["deepseek"].api_key, "***");
        assert_eq!(cfg.ai.services["deepseek"].api_key, "sk-secret");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "bind_address = [").unwrap();
        assert!(matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
