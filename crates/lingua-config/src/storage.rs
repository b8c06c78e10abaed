use serde::{Deserialize, Serialize};

use crate::env_string;

const LOCAL_DATABASE_URL: &str = "sqlite://./local.db";

fn default_database_url() -> String {
    LOCAL_DATABASE_URL.to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        let database_url = env_string("DATABASE_URL", default_database_url);
        Self {
            database_url: usable_database_url(&database_url),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

/// Template or non-sqlite URLs fall back to the local sqlite file
pub fn usable_database_url(url: &str) -> String {
    if url.is_empty() || url.contains("postgres.USER") {
        tracing::warn!("Valid DATABASE_URL not found, using {LOCAL_DATABASE_URL}");
        return default_database_url();
    }

    if !url.starts_with("sqlite:") {
        tracing::warn!("Only sqlite databases are supported, using {LOCAL_DATABASE_URL}");
        return default_database_url();
    }

    url.to_string()
}
