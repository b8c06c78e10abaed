use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use lingua_types::{CachedWord, NewWord, WordFlagsPatch};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::ApiError;
use crate::state::AppState;

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize)]
struct Page {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/words", get(list_words).post(create_word))
        .route("/words/{id}", patch(update_word).delete(delete_word))
}

/// Newest first
async fn list_words(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<CachedWord>>, ApiError> {
    let words = state.words.list(page.limit.max(0), page.offset.max(0)).await?;
    Ok(Json(words))
}

/// Idempotent by exact `original`
async fn create_word(
    State(state): State<AppState>,
    Json(word): Json<NewWord>,
) -> Result<Json<CachedWord>, ApiError> {
    if let Some(existing) = state.words.find_by_original(&word.original).await? {
        return Ok(Json(existing));
    }

    Ok(Json(state.words.insert(word).await?))
}

async fn update_word(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<WordFlagsPatch>,
) -> Result<Json<CachedWord>, ApiError> {
    state
        .words
        .update_flags(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Word not found"))
}

async fn delete_word(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.words.delete(id).await? {
        return Err(ApiError::not_found("Word not found"));
    }

    Ok(Json(json!({ "message": "Word deleted" })))
}
