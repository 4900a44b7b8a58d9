use std::sync::Arc;

use anyhow::Context;
use axum::middleware::from_fn;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    config::Config,
    error::NO_DATA_WARNING,
    index::load_index,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    routes::{create_router, AppState},
    services::posters::TmdbPosterProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Loading movie catalog");

    let data_dir = config.data_dir.clone();
    let (index, source) = tokio::task::spawn_blocking(move || load_index(&data_dir))
        .await
        .context("Index loading task panicked")?;

    if index.is_empty() {
        tracing::warn!(%source, "{}", NO_DATA_WARNING);
    }

    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY not set, every poster will be the placeholder");
    }
    let posters = TmdbPosterProvider::from_config(&config)
        .context("Failed to build TMDB client")?;

    let state = AppState::new(index, Arc::new(posters));

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
            .layer(CorsLayer::permissive()),
    );

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
