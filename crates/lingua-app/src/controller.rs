use axum::Router;
use axum::routing::get;
use lingua_config::server::ServerConfig;
use serde_json::{Value, json};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Full HTTP surface bound to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", api::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> axum::Json<Value> {
    axum::Json(json!({ "status": "ok", "service": "LinguaLearn API" }))
}

/// Task spawning and lifecycle
pub struct AppController {
    state: AppState,
    server: ServerConfig,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: AppState, server: ServerConfig) -> Self {
        Self {
            state,
            server,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(serve(
            self.state.clone(),
            self.server.bind_addr(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

async fn serve(state: AppState, addr: String, cancel: CancellationToken) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("LinguaLearn API listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
