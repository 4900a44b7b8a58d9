use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Deserialize;

use super::{Catalog, IndexResult, SimilarityIndex, SimilarityMatrix};
use crate::models::{Movie, MovieId};

pub const CATALOG_ARTIFACT: &str = "movie_list.json";
pub const SIMILARITY_ARTIFACT: &str = "similarity.json";
pub const RAW_CSV: &str = "tmdb_5000_movies.csv";

/// Where the running index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Artifacts,
    Csv,
    Empty,
}

impl std::fmt::Display for IndexSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndexSource::Artifacts => "artifacts",
            IndexSource::Csv => "csv",
            IndexSource::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Loads the index from `data_dir`.
///
/// Precomputed artifacts are preferred; otherwise the index is built from the
/// raw CSV. When neither is usable the index is empty. Never fails.
pub fn load_index(data_dir: &Path) -> (SimilarityIndex, IndexSource) {
    match load_artifacts(data_dir) {
        Ok(index) => {
            tracing::info!(
                catalog_size = index.catalog().len(),
                source = %IndexSource::Artifacts,
                "Loaded similarity index"
            );
            return (index, IndexSource::Artifacts);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Precomputed artifacts unavailable, building from CSV");
        }
    }

    match build_from_csv(&data_dir.join(RAW_CSV)) {
        Ok(index) => {
            tracing::info!(
                catalog_size = index.catalog().len(),
                source = %IndexSource::Csv,
                "Built similarity index"
            );
            (index, IndexSource::Csv)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Raw CSV unavailable, starting with an empty catalog");
            (SimilarityIndex::empty(), IndexSource::Empty)
        }
    }
}

/// Reads `movie_list.json` and `similarity.json`
pub fn load_artifacts(data_dir: &Path) -> IndexResult<SimilarityIndex> {
    let catalog: Catalog = read_json(&data_dir.join(CATALOG_ARTIFACT))?;
    let similarity: SimilarityMatrix = read_json(&data_dir.join(SIMILARITY_ARTIFACT))?;
    SimilarityIndex::new(catalog, similarity)
}

/// Writes both artifacts into `out_dir`; overviews are not persisted
pub fn save_artifacts(index: &SimilarityIndex, out_dir: &Path) -> IndexResult<()> {
    std::fs::create_dir_all(out_dir)?;

    let writer = BufWriter::new(File::create(out_dir.join(CATALOG_ARTIFACT))?);
    serde_json::to_writer(writer, &index.catalog().without_overviews())?;

    let writer = BufWriter::new(File::create(out_dir.join(SIMILARITY_ARTIFACT))?);
    serde_json::to_writer(writer, index.similarity())?;

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> IndexResult<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Row of the TMDB movies export; other columns are ignored
#[derive(Debug, Deserialize)]
struct CsvMovie {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    id: Option<u64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    overview: Option<String>,
}

impl From<CsvMovie> for Movie {
    fn from(row: CsvMovie) -> Self {
        Movie::new(
            row.id.and_then(MovieId::from_raw),
            row.title,
            row.overview.unwrap_or_default(),
        )
    }
}

/// Reads the raw CSV and builds the index on the fly.
///
/// Rows that cannot be decoded are skipped.
pub fn build_from_csv(path: &Path) -> IndexResult<SimilarityIndex> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut movies = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.deserialize::<CsvMovie>().enumerate() {
        match record {
            Ok(row) => movies.push(Movie::from(row)),
            Err(e) => {
                skipped += 1;
                tracing::debug!(row = line + 1, error = %e, "Skipping malformed CSV row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "Skipped malformed CSV rows");
    }

    Ok(SimilarityIndex::build(movies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "\
budget,id,overview,title
237000000,19995,A paraplegic marine dispatched to the moon Pandora,Avatar
300000000,285,\"Captain Barbossa, long believed to be dead\",Pirates of the Caribbean
0,,,Untitled Project
245000000,206647,A cryptic message from Bond's past sends him on a trail,Spectre
";

    #[test]
    fn test_build_from_csv_reads_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RAW_CSV);
        fs::write(&path, CSV).unwrap();

        let index = build_from_csv(&path).unwrap();
        let catalog = index.catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(0).unwrap().movie_id, Some(MovieId(19995)));
        assert_eq!(catalog.get(1).unwrap().title, "Pirates of the Caribbean");
        assert_eq!(catalog.get(2).unwrap().movie_id, None);
        assert_eq!(catalog.get(2).unwrap().overview, "");
        assert_eq!(index.similarity().size(), 4);
    }

    #[test]
    fn test_load_prefers_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RAW_CSV), CSV).unwrap();

        let built = build_from_csv(&dir.path().join(RAW_CSV)).unwrap();
        save_artifacts(&built, dir.path()).unwrap();

        let (index, source) = load_index(dir.path());
        assert_eq!(source, IndexSource::Artifacts);
        assert_eq!(index.catalog().titles(), built.catalog().titles());
        assert_eq!(index.similarity(), built.similarity());
        assert!(index.catalog().movies().iter().all(|m| m.overview.is_empty()));
    }

    #[test]
    fn test_load_falls_back_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RAW_CSV), CSV).unwrap();

        let (index, source) = load_index(dir.path());
        assert_eq!(source, IndexSource::Csv);
        assert_eq!(index.catalog().len(), 4);
    }

    #[test]
    fn test_load_falls_back_to_csv_on_corrupt_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RAW_CSV), CSV).unwrap();
        fs::write(dir.path().join(CATALOG_ARTIFACT), "[]").unwrap();
        fs::write(dir.path().join(SIMILARITY_ARTIFACT), "{\"size\": 3").unwrap();

        let (_, source) = load_index(dir.path());
        assert_eq!(source, IndexSource::Csv);
    }

    #[test]
    fn test_misaligned_artifacts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CATALOG_ARTIFACT),
            r#"[{"movie_id": 1, "title": "Heat"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(SIMILARITY_ARTIFACT),
            r#"{"size": 2, "values": [1.0, 0.0, 0.0, 1.0]}"#,
        )
        .unwrap();

        assert!(load_artifacts(dir.path()).is_err());
        let (index, source) = load_index(dir.path());
        assert_eq!(source, IndexSource::Empty);
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_without_any_data_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (index, source) = load_index(dir.path());
        assert_eq!(source, IndexSource::Empty);
        assert!(index.is_empty());
    }
}
