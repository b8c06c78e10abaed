use axum::Router;

use crate::state::AppState;

mod error;
mod settings;
mod translate;
mod words;

pub use error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(translate::routes())
        .merge(words::routes())
        .merge(settings::routes())
}
