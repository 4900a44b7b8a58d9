use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use super::stopwords::is_english_stop_word;

/// Runs of two or more word characters, as in the usual count-vectorizer default
const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

/// Sparse row of `(term_index, count)` pairs, sorted by term index
pub type SparseRow = Vec<(usize, u32)>;

/// Bag-of-words counts for every document, over a shared vocabulary
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    vocabulary: Vec<String>,
    rows: Vec<SparseRow>,
}

impl FeatureMatrix {
    /// Terms in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of a term, if it made it into the vocabulary
    #[cfg(test)]
    pub(crate) fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

/// Term-count vectorizer.
///
/// Text is lowercased and split on [`TOKEN_PATTERN`]; stop words are dropped
/// when enabled. The vocabulary is every remaining term across all documents,
/// sorted lexicographically.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    drop_english_stop_words: bool,
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vectorizer that drops English stop words
    pub fn english() -> Self {
        Self {
            drop_english_stop_words: true,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        token_regex()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !(self.drop_english_stop_words && is_english_stop_word(t)))
            .map(str::to_string)
            .collect()
    }

    /// Builds the vocabulary from `documents` and counts terms per document
    pub fn fit_transform<'a, I>(&self, documents: I) -> FeatureMatrix
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = documents.into_iter().map(|d| self.tokenize(d)).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    if let Some(&col) = columns.get(token.as_str()) {
                        *counts.entry(col).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        FeatureMatrix { vocabulary, rows }
    }
}
