use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use lingua_config::Config;
use lingua_config::storage::usable_database_url;

/// Config from `path` when given, else from the environment
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    tracing::info!("Loading config from {}", path.display());
    let file =
        File::open(path).with_context(|| format!("failed to open config {}", path.display()))?;
    let mut config: Config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    config.storage.database_url = usable_database_url(&config.storage.database_url);
    Ok(config)
}
