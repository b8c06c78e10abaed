use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use lingua_types::LookupResult;
use serde::Deserialize;

use crate::api::ApiError;
use crate::state::AppState;

fn default_target_lang() -> String {
    "zh".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest {
    text: String,
    #[serde(default = "default_target_lang", alias = "target_lang")]
    target_lang: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate))
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<LookupResult>, ApiError> {
    match state.resolver.resolve(&request.text, &request.target_lang).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("Translation of '{}' failed: {}", request.text, e);
            Err(e.into())
        }
    }
}
