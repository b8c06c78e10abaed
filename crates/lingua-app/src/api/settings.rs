use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use lingua_types::{Settings, SettingsUpdate};

use crate::api::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.settings.settings().await?))
}

async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.settings.update_settings(update).await?))
}
