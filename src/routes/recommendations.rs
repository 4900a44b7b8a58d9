use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
    services::recommendations::recommend_with_posters,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Any string, including an empty catalog title
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<Recommendation>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let index = state.require_catalog()?;
    let title = params
        .title
        .ok_or_else(|| AppError::InvalidInput("title is required".to_string()))?;

    let recommendations = recommend_with_posters(index, state.posters.as_ref(), &title).await;

    Ok(Json(RecommendationResponse {
        query: title,
        recommendations,
    }))
}
