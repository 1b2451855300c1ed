use std::sync::Arc;

use axum::{Router, routing::get};

use crate::core::SearchOrchestrator;

pub mod api_error;
pub mod handlers;
pub mod identity;

pub use api_error::{ApiError, ResultIntoApiError};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SearchOrchestrator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::search_all))
        .route("/search/popular", get(handlers::popular_queries))
        .route("/search/{journal_id}", get(handlers::search_journal))
        .with_state(state)
}
