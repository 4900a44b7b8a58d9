use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDB numeric identifier of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl MovieId {
    /// Zero is not a valid TMDB id and is treated as absent.
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub movie_id: Option<MovieId>,
    pub title: String,
    /// Free-text summary, only needed while building the index
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    pub fn new(
        movie_id: Option<MovieId>,
        title: impl Into<String>,
        overview: impl Into<String>,
    ) -> Self {
        Self {
            movie_id,
            title: title.into(),
            overview: overview.into(),
        }
    }
}

/// A ranked lookup result before poster resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedMovie {
    pub title: String,
    pub movie_id: Option<MovieId>,
    pub score: f32,
}

/// A recommendation decorated with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub movie_id: Option<MovieId>,
    pub poster_url: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /3/movie/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}
