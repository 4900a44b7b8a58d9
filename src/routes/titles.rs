use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    services::recommendations::random_pick,
};

#[derive(Debug, Serialize)]
pub struct RandomPick {
    pub title: String,
}

/// Every catalog title, in catalog order
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let index = state.require_catalog()?;
    let titles = index
        .catalog()
        .titles()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(titles))
}

/// One uniformly sampled title
pub async fn random(State(state): State<AppState>) -> AppResult<Json<RandomPick>> {
    let index = state.require_catalog()?;
    let title = random_pick(index).ok_or(AppError::NoCatalog)?;
    Ok(Json(RandomPick { title }))
}
