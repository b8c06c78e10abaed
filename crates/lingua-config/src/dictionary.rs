use serde::{Deserialize, Serialize};

use crate::{env_or, env_string};

fn default_enabled() -> bool {
    true
}

fn default_disabled() -> bool {
    false
}

fn default_local_path() -> String {
    "ecdict.db".to_string()
}

fn default_remote_url() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
}

fn default_bing_url() -> String {
    "https://cn.bing.com/dict/search".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Offline ECDICT dataset, only consulted for Chinese targets
    #[serde(default = "default_enabled")]
    pub local_enabled: bool,
    #[serde(default = "default_local_path")]
    pub local_path: String,
    /// Networked English dictionary used for enrichment
    #[serde(default = "default_enabled")]
    pub remote_enabled: bool,
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    /// Scraped Bing dictionary page, Chinese targets only
    #[serde(default = "default_disabled")]
    pub bing_enabled: bool,
    #[serde(default = "default_bing_url")]
    pub bing_url: String,
}

impl DictionaryConfig {
    pub fn new() -> Self {
        Self {
            local_enabled: env_or("LOCAL_DICTIONARY_ENABLED", default_enabled()),
            local_path: env_string("ECDICT_PATH", default_local_path),
            remote_enabled: env_or("REMOTE_DICTIONARY_ENABLED", default_enabled()),
            remote_url: env_string("DICTIONARY_API_URL", default_remote_url),
            bing_enabled: env_or("BING_DICTIONARY_ENABLED", default_disabled()),
            bing_url: env_string("BING_DICTIONARY_URL", default_bing_url),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            local_enabled: default_enabled(),
            local_path: default_local_path(),
            remote_enabled: default_enabled(),
            remote_url: default_remote_url(),
            bing_enabled: default_disabled(),
            bing_url: default_bing_url(),
        }
    }
}
