use serde::{Deserialize, Serialize};

use super::vectorize::{FeatureMatrix, SparseRow};
use super::{IndexError, IndexResult};

/// Square, row-major matrix of pairwise cosine similarities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct RawMatrix {
    size: usize,
    values: Vec<f32>,
}

impl TryFrom<RawMatrix> for SimilarityMatrix {
    type Error = IndexError;

    fn try_from(raw: RawMatrix) -> IndexResult<Self> {
        Self::from_values(raw.size, raw.values)
    }
}

impl SimilarityMatrix {
    /// Wraps precomputed row-major values
    pub fn from_values(size: usize, values: Vec<f32>) -> IndexResult<Self> {
        let expected = size
            .checked_mul(size)
            .ok_or_else(|| IndexError::Malformed(format!("size {size} overflows")))?;
        if values.len() != expected {
            return Err(IndexError::Malformed(format!(
                "expected {expected} values for size {size}, found {}",
                values.len()
            )));
        }
        Ok(Self { size, values })
    }

    /// Cosine similarity of every pair of feature rows.
    ///
    /// The diagonal is exactly `1.0`, even for rows without any terms. Any pair
    /// involving an all-zero row scores `0.0`.
    pub fn from_features(features: &FeatureMatrix) -> Self {
        let size = features.len();
        let rows = features.rows();
        let norms: Vec<f64> = rows.iter().map(|r| norm(r)).collect();
        let mut values = vec![0.0f32; size * size];

        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let score = if norms[i] == 0.0 || norms[j] == 0.0 {
                    0.0
                } else {
                    (dot(&rows[i], &rows[j]) / (norms[i] * norms[j])) as f32
                };
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        Self { size, values }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.size).then(|| &self.values[i * self.size..(i + 1) * self.size])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        (i < self.size && j < self.size).then(|| self.values[i * self.size + j])
    }
}

fn norm(row: &SparseRow) -> f64 {
    row.iter()
        .map(|&(_, c)| f64::from(c) * f64::from(c))
        .sum::<f64>()
        .sqrt()
}

/// Dot product of two rows sorted by term index
fn dot(a: &SparseRow, b: &SparseRow) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += f64::from(a[i].1) * f64::from(b[j].1);
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CountVectorizer;

    fn matrix(docs: &[&str]) -> SimilarityMatrix {
        let features = CountVectorizer::english().fit_transform(docs.iter().copied());
        SimilarityMatrix::from_features(&features)
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let m = matrix(&[
            "space adventure",
            "space war",
            "romance drama",
            "war drama in space",
            "",
        ]);
        assert_eq!(m.size(), 5);
        for i in 0..m.size() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_cosine_scores() {
        let m = matrix(&["space adventure", "space war", "romance drama"]);
        assert!((m.get(0, 1).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(m.get(0, 2), Some(0.0));
    }

    #[test]
    fn test_empty_overview_scores_zero_against_others() {
        let m = matrix(&["space adventure", ""]);
        assert_eq!(m.get(0, 1), Some(0.0));
        assert_eq!(m.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_empty_features_give_empty_matrix() {
        let m = SimilarityMatrix::from_features(&FeatureMatrix::default());
        assert!(m.is_empty());
        assert_eq!(m.row(0), None);
    }

    #[test]
    fn test_row_access() {
        let m = SimilarityMatrix::from_values(2, vec![1.0, 0.25, 0.25, 1.0]).unwrap();
        assert_eq!(m.row(1), Some(&[0.25, 1.0][..]));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        let err = serde_json::from_str::<SimilarityMatrix>(r#"{"size": 2, "values": [1.0, 0.0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("expected 4 values"));

        let ok: SimilarityMatrix =
            serde_json::from_str(r#"{"size": 1, "values": [1.0]}"#).unwrap();
        assert_eq!(ok.size(), 1);
    }
}
