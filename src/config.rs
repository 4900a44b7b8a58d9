use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::services::posters::{
    DEFAULT_IMAGE_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_PLACEHOLDER_URL, DEFAULT_TMDB_API_URL,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding `movie_list.json`, `similarity.json` or `tmdb_5000_movies.csv`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// TMDB API key; poster lookups fall back to the placeholder without it
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Language code sent with metadata requests
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Image returned whenever a poster cannot be resolved
    #[serde(default = "default_poster_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Per-request timeout for poster lookups, in seconds
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tmdb_api_url() -> String {
    DEFAULT_TMDB_API_URL.to_string()
}

fn default_tmdb_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_tmdb_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_poster_placeholder_url() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

fn default_poster_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_secs(self.poster_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
