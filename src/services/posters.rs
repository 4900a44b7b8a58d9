//! Poster resolution against the TMDB metadata API.
//!
//! Lookups are best-effort: every failure is classified as a [`PosterError`]
//! and then replaced by the placeholder image. No retries, no caching.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::instrument;

use crate::{
    config::Config,
    models::{MovieId, TmdbMovieDetails},
};

pub const DEFAULT_TMDB_API_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/150";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Why a poster could not be resolved
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    #[error("movie has no id")]
    MissingId,

    #[error("no TMDB API key configured")]
    MissingApiKey,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("TMDB returned status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("response has no poster path")]
    MissingPosterPath,
}

impl From<reqwest::Error> for PosterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PosterError::Timeout
        } else if e.is_decode() {
            PosterError::MalformedPayload(e.to_string())
        } else {
            PosterError::Network(e)
        }
    }
}

/// Source of poster images
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Full poster URL for a movie
    async fn fetch_poster(&self, movie_id: Option<MovieId>) -> Result<String, PosterError>;

    /// Image used whenever `fetch_poster` fails
    fn placeholder(&self) -> String;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Resolves a poster, substituting the placeholder on any error
pub async fn poster_or_placeholder(
    provider: &dyn PosterProvider,
    movie_id: Option<MovieId>,
) -> String {
    match provider.fetch_poster(movie_id).await {
        Ok(url) => url,
        Err(e) => {
            match &e {
                PosterError::MissingId
                | PosterError::MissingApiKey
                | PosterError::MissingPosterPath => {
                    tracing::debug!(
                        provider = provider.name(),
                        movie_id = ?movie_id,
                        error = %e,
                        "Using placeholder poster"
                    );
                }
                _ => {
                    tracing::warn!(
                        provider = provider.name(),
                        movie_id = ?movie_id,
                        error = %e,
                        "Poster lookup failed"
                    );
                }
            }
            provider.placeholder()
        }
    }
}

#[derive(Clone)]
pub struct TmdbPosterProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base_url: String,
    language: String,
    placeholder: String,
}

impl TmdbPosterProvider {
    pub fn new(
        api_key: Option<String>,
        api_url: impl Into<String>,
        image_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PosterError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(PosterError::Network)?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|k| !k.is_empty()),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER_URL.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PosterError> {
        Ok(Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base_url.clone(),
            config.poster_timeout(),
        )?
        .with_language(config.tmdb_language.clone())
        .with_placeholder(config.poster_placeholder_url.clone()))
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}/{}", self.image_base_url, poster_path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    #[instrument(skip(self))]
    async fn fetch_poster(&self, movie_id: Option<MovieId>) -> Result<String, PosterError> {
        let movie_id = movie_id.ok_or(PosterError::MissingId)?;
        let api_key = self.api_key.as_deref().ok_or(PosterError::MissingApiKey)?;

        let url = format!("{}/3/movie/{}", self.api_url, movie_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let details: TmdbMovieDetails = serde_json::from_slice(&body)
            .map_err(|e| PosterError::MalformedPayload(e.to_string()))?;

        match details.poster_path.as_deref() {
            Some(path) if !path.is_empty() => Ok(self.poster_url(path)),
            _ => Err(PosterError::MissingPosterPath),
        }
    }

    fn placeholder(&self) -> String {
        self.placeholder.clone()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
