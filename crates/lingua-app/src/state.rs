use std::sync::Arc;

use lingua_config::Config;
use lingua_resolver::Resolver;
use lingua_store::{SettingsStore, SqliteStore, WordStore};

use crate::bootstrap::build_resolver;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub words: Arc<dyn WordStore>,
    pub settings: Arc<dyn SettingsStore>,
}

impl AppState {
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(SqliteStore::connect(&config.storage.database_url).await?);
        let resolver = build_resolver(config, store.clone()).await?;

        Ok(Self {
            resolver: Arc::new(resolver),
            words: store.clone(),
            settings: store,
        })
    }
}
