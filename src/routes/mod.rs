use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    index::SimilarityIndex,
    services::posters::PosterProvider,
};

pub mod recommendations;
pub mod titles;

/// Read-only state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SimilarityIndex>,
    pub posters: Arc<dyn PosterProvider>,
}

impl AppState {
    pub fn new(index: SimilarityIndex, posters: Arc<dyn PosterProvider>) -> Self {
        Self {
            index: Arc::new(index),
            posters,
        }
    }

    /// Refuses every catalog operation when no movie data could be loaded
    pub fn require_catalog(&self) -> AppResult<&SimilarityIndex> {
        if self.index.is_empty() {
            return Err(AppError::NoCatalog);
        }
        Ok(&self.index)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/titles", get(titles::list))
        .route("/titles/random", get(titles::random))
        .route("/recommendations", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_size": state.index.catalog().len(),
        })),
    )
}
