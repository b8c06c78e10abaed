use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::llm::LlmConfig;
use self::network::NetworkConfig;
use self::server::ServerConfig;
use self::storage::StorageConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod llm;
pub mod network;
pub mod server;
pub mod storage;
pub mod translator;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub network: NetworkConfig,
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build the config from the process environment
    pub fn new() -> Self {
        Config {
            server: ServerConfig::new(),
            storage: StorageConfig::new(),
            network: NetworkConfig::new(),
            dictionary: DictionaryConfig::new(),
            translator: TranslatorConfig::new(),
            llm: LlmConfig::new(),
        }
    }
}

/// Parsed env var, or `default` when unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: impl FnOnce() -> String) -> String {
    env::var(key).unwrap_or_else(|_| default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "server": { "port": 9000 }, "llm": { "default_provider": "gemini" } }"#)
                .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.default_provider, "gemini");
        assert_eq!(config.translator.provider, "google");
        assert!(config.dictionary.local_enabled);
        assert_eq!(config.network.request_timeout_secs, 30);
    }
}
