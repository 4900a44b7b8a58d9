//! Builds `movie_list.json` and `similarity.json` from the raw TMDB CSV.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::index::{loader::build_from_csv, save_artifacts};

#[derive(Debug, Parser)]
#[command(name = "build-index", about = "Precompute the movie similarity index")]
struct Args {
    /// Raw CSV with `id`, `title` and `overview` columns
    #[arg(long, default_value = "tmdb_5000_movies.csv")]
    csv: PathBuf,

    /// Directory the artifacts are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,build_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let index = build_from_csv(&args.csv)
        .with_context(|| format!("Failed to build index from {}", args.csv.display()))?;
    tracing::info!(
        catalog_size = index.catalog().len(),
        matrix_size = index.similarity().size(),
        "Index built"
    );

    save_artifacts(&index, &args.out)
        .with_context(|| format!("Failed to write artifacts to {}", args.out.display()))?;
    tracing::info!(out = %args.out.display(), "Artifacts written");

    Ok(())
}
