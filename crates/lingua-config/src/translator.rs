use serde::{Deserialize, Serialize};

use crate::{env_or, env_string};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "google".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// "google" or "deepl"
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    /// Empty means the provider's public endpoint
    #[serde(default)]
    pub api_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            enabled: env_or("TRANSLATOR_ENABLED", default_enabled()),
            provider: env_string("TRANSLATOR_PROVIDER", default_provider),
            api_key: env_string("TRANSLATOR_API_KEY", String::new),
            api_url: env_string("TRANSLATOR_API_URL", String::new),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: String::new(),
            api_url: String::new(),
        }
    }
}
