use serde::{Deserialize, Serialize};

use crate::env_string;

fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_sentence_backend() -> String {
    "llm".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_openrouter_model() -> String {
    "deepseek/deepseek-r1-0528:free".to_string()
}

fn default_openrouter_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Registry name used when no explicit provider is requested
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// "llm" or "translator"
    #[serde(default = "default_sentence_backend")]
    pub sentence_backend: String,
    pub gemini: ProviderConfig,
    pub openrouter: ProviderConfig,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    pub fn new() -> Self {
        Self {
            default_provider: env_string("LLM_PROVIDER", default_provider),
            sentence_backend: env_string("SENTENCE_BACKEND", default_sentence_backend),
            gemini: ProviderConfig {
                api_key: env_string("GOOGLE_API_KEY", String::new),
                model: env_string("GEMINI_MODEL", default_gemini_model),
                base_url: env_string("GEMINI_BASE_URL", default_gemini_url),
            },
            openrouter: ProviderConfig {
                api_key: env_string("OPENROUTER_API_KEY", String::new),
                model: env_string("OPENROUTER_MODEL", default_openrouter_model),
                base_url: env_string("OPENROUTER_BASE_URL", default_openrouter_url),
            },
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            sentence_backend: default_sentence_backend(),
            gemini: ProviderConfig {
                api_key: String::new(),
                model: default_gemini_model(),
                base_url: default_gemini_url(),
            },
            openrouter: ProviderConfig {
                api_key: String::new(),
                model: default_openrouter_model(),
                base_url: default_openrouter_url(),
            },
        }
    }
}
