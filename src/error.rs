use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Warning shown when neither precomputed artifacts nor the raw CSV could be loaded
pub const NO_DATA_WARNING: &str = "No movie data available. Place 'tmdb_5000_movies.csv' or \
precomputed 'movie_list.json' and 'similarity.json' in the data directory.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{}", NO_DATA_WARNING)]
    NoCatalog,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NoCatalog => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
