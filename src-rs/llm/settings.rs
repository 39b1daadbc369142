//! Provider configuration: one mutable default plus an ordered registry of
//! named custom configurations. The effective configuration is resolved on
//! every call.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::helpers::mask_key;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_enabled() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: u64,
}

/// Partial update for the default configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AiConfigUpdate {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomAiConfig {
    pub id: String,
    pub name: String,
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl CustomAiConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }

    pub fn to_ai_config(&self) -> AiConfig {
        AiConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout: self.timeout,
        }
    }

    pub fn masked(&self) -> MaskedCustomConfig {
        MaskedCustomConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            api_base: self.api_base.clone(),
            api_key: mask_key(&self.api_key),
            model: self.model.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            timeout: self.timeout,
            has_api_key: !self.api_key.is_empty(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MaskedCustomConfig {
    pub id: String,
    pub name: String,
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub description: String,
    pub enabled: bool,
    pub timeout: u64,
    pub has_api_key: bool,
}

/// What `GET /ai/config` reports; never includes the key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AiConfigView {
    pub api_base: String,
    pub model: String,
    pub has_api_key: bool,
    pub timeout: u64,
}

impl From<&AiConfig> for AiConfigView {
    fn from(cfg: &AiConfig) -> Self {
        Self {
            api_base: cfg.api_base.clone(),
            model: cfg.model.clone(),
            has_api_key: !cfg.api_key.is_empty(),
            timeout: cfg.timeout,
        }
    }
}

pub struct ProviderRegistry {
    default: RwLock<AiConfig>,
    custom: RwLock<Vec<CustomAiConfig>>,
}

impl ProviderRegistry {
    pub fn new(default: AiConfig) -> Self {
        Self {
            default: RwLock::new(default),
            custom: RwLock::new(Vec::new()),
        }
    }

    /// The first enabled custom configuration with a key, else the default.
    pub fn effective(&self) -> AiConfig {
        let custom = self.custom.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cfg) = custom.iter().find(|cfg| cfg.is_usable()) {
            return cfg.to_ai_config();
        }
        drop(custom);
        self.default_config()
    }

    pub fn default_config(&self) -> AiConfig {
        self.default.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn update_default(&self, update: AiConfigUpdate) -> AiConfig {
        let mut cfg = self.default.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(api_key) = update.api_key {
            cfg.api_key = api_key;
        }
        if let Some(api_base) = update.api_base {
            cfg.api_base = api_base;
        }
        if let Some(model) = update.model {
            cfg.model = model;
        }
        if let Some(timeout) = update.timeout {
            cfg.timeout = timeout;
        }
        cfg.clone()
    }

    /// Inserts or replaces by id. A replaced entry keeps its scan position.
    pub fn save_custom(&self, config: CustomAiConfig) {
        let mut custom = self.custom.write().unwrap_or_else(PoisonError::into_inner);
        match custom.iter_mut().find(|existing| existing.id == config.id) {
            Some(existing) => *existing = config,
            None => custom.push(config),
        }
    }

    pub fn delete_custom(&self, id: &str) -> Option<CustomAiConfig> {
        let mut custom = self.custom.write().unwrap_or_else(PoisonError::into_inner);
        let idx = custom.iter().position(|cfg| cfg.id == id)?;
        Some(custom.remove(idx))
    }

    pub fn list_custom(&self) -> Vec<MaskedCustomConfig> {
        let custom = self.custom.read().unwrap_or_else(PoisonError::into_inner);
        custom.iter().map(CustomAiConfig::masked).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_cfg() -> AiConfig {
        AiConfig {
            api_base: "https://api.deepseek.com".to_string(),
            api_key: String::new(),
            model: "deepseek-chat".to_string(),
            timeout: 30,
        }
    }

    fn custom(id: &str, key: &str, enabled: bool) -> CustomAiConfig {
        CustomAiConfig {
            id: id.to_string(),
            name: format!("{} name", id),
            api_base: format!("https://{}.example.com", id),
            api_key: key.to_string(),
            model: format!("{}-model", id),
            description: String::new(),
            enabled,
            timeout: 45,
        }
    }

    #[test]
    fn falls_back_to_default_without_custom_configs() {
        let registry = ProviderRegistry::new(default_cfg());
        assert_eq!(registry.effective(), default_cfg());
    }

    #[test]
    fn first_enabled_keyed_custom_config_wins() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.save_custom(custom("first", "sk-first", false));
        registry.save_custom(custom("second", "sk-second", true));

        let effective = registry.effective();
        assert_eq!(effective.api_base, "https://second.example.com");
        assert_eq!(effective.api_key, "sk-second");
        assert_eq!(effective.model, "second-model");
        assert_eq!(effective.timeout, 45);
    }

    #[test]
    fn enabled_config_without_key_is_skipped() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.save_custom(custom("empty", "", true));
        assert_eq!(registry.effective(), default_cfg());
    }

    #[test]
    fn selection_is_reevaluated_after_delete() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.save_custom(custom("only", "sk-only", true));
        assert_eq!(registry.effective().api_key, "sk-only");
        assert!(registry.delete_custom("only").is_some());
        assert_eq!(registry.effective(), default_cfg());
        assert!(registry.delete_custom("only").is_none());
    }

    #[test]
    fn listing_masks_keys() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.save_custom(custom("a", "sk-secret", true));
        registry.save_custom(custom("b", "", true));
        let listed = registry.list_custom();
        assert_eq!(listed[0].api_key, "***");
        assert!(listed[0].has_api_key);
        assert_eq!(listed[1].api_key, "");
        assert!(!listed[1].has_api_key);
    }

    #[test]
    fn resaving_keeps_position() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.save_custom(custom("a", "sk-a", true));
        registry.save_custom(custom("b", "sk-b", true));
        registry.save_custom(custom("a", "sk-a2", true));
        let ids: Vec<String> = registry.list_custom().into_iter().map(|cfg| cfg.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(registry.effective().api_key, "sk-a2");
    }

    #[test]
    fn partial_update_only_touches_given_fields() {
        let registry = ProviderRegistry::new(default_cfg());
        registry.update_default(AiConfigUpdate {
            api_key: Some("sk-new".to_string()),
            ..Default::default()
        });
        let cfg = registry.default_config();
        assert_eq!(cfg.api_key, "sk-new");
        assert_eq!(cfg.model, "deepseek-chat");
    }
}
