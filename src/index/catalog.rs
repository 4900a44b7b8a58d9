use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Movie;

/// Ordered list of recommendable movies.
///
/// Titles are not unique; lookups resolve to the first matching row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// All titles in catalog order
    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }

    /// Row of the first movie whose title matches exactly (case-sensitive)
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// Uniformly samples one title
    pub fn random_title<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.movies.choose(rng).map(|m| m.title.as_str())
    }

    /// Drops overviews, which are only needed while vectorizing
    pub fn without_overviews(&self) -> Self {
        Self::new(
            self.movies
                .iter()
                .map(|m| Movie::new(m.movie_id, m.title.clone(), String::new()))
                .collect(),
        )
    }
}
