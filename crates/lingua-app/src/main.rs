use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod api;
mod bootstrap;
mod config_file;
mod controller;
mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "lingua", about = "LinguaLearn lookup and translation service")]
struct Cli {
    /// Bind address, overrides HOST
    #[arg(long)]
    host: Option<String>,
    /// HTTP port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
    /// JSON config file replacing the environment-derived config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Force JSON log lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json || !atty::is(atty::Stream::Stdout) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = config_file::load_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let state = AppState::build(&config).await?;
    let controller = AppController::new(state, config.server.clone());
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("server task exited"),
                Ok(Err(e)) => tracing::error!("server task failed: {e}"),
                Err(e) => tracing::error!("server task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::error!("task failed during shutdown: {e}");
        }
    }

    tracing::info!("Bye");
    Ok(())
}
