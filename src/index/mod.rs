//! Offline-built similarity index over the movie catalog.
//!
//! The catalog and its cosine-similarity matrix are built together, aligned by
//! row, and never mutated afterwards. Handlers share one index behind an `Arc`.

pub mod catalog;
pub mod loader;
pub mod similarity;
pub mod stopwords;
pub mod vectorize;

pub use catalog::Catalog;
pub use loader::{load_index, save_artifacts, IndexSource};
pub use similarity::SimilarityMatrix;
pub use vectorize::{CountVectorizer, FeatureMatrix};

use crate::models::Movie;

/// Errors raised while loading, building or persisting the index
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed similarity matrix: {0}")]
    Malformed(String),

    #[error("Catalog has {catalog} rows but similarity matrix has {matrix}")]
    Misaligned { catalog: usize, matrix: usize },
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Catalog plus its pairwise similarity matrix
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Pairs a catalog with a precomputed matrix, rejecting size mismatches
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> IndexResult<Self> {
        if catalog.len() != similarity.size() {
            return Err(IndexError::Misaligned {
                catalog: catalog.len(),
                matrix: similarity.size(),
            });
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// Vectorizes every overview and computes the similarity matrix.
    ///
    /// An empty input yields an empty index rather than an error.
    pub fn build(movies: Vec<Movie>) -> Self {
        let features =
            CountVectorizer::english().fit_transform(movies.iter().map(|m| m.overview.as_str()));
        let similarity = SimilarityMatrix::from_features(&features);

        tracing::debug!(
            rows = movies.len(),
            vocabulary = features.vocabulary().len(),
            "Similarity index built"
        );

        Self {
            catalog: Catalog::new(movies),
            similarity,
        }
    }

    pub fn empty() -> Self {
        Self {
            catalog: Catalog::default(),
            similarity: SimilarityMatrix::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// No recommendation is possible on an empty index
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty() || self.similarity.is_empty()
    }
}
