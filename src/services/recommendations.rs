use rand::Rng;

use crate::{
    index::SimilarityIndex,
    models::{Recommendation, RecommendedMovie},
    services::posters::{poster_or_placeholder, PosterProvider},
};

/// Number of titles returned per query
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Most similar titles to `title`, best first.
///
/// The first catalog row whose title matches exactly is the query row; it is
/// never part of the result. Unknown titles and an empty index give an empty
/// result. Equal scores keep catalog order.
pub fn recommend(index: &SimilarityIndex, title: &str) -> Vec<RecommendedMovie> {
    if index.is_empty() {
        return Vec::new();
    }

    let catalog = index.catalog();
    let Some(query_row) = catalog.position_of(title) else {
        tracing::debug!(title, "Title not in catalog");
        return Vec::new();
    };
    let Some(scores) = index.similarity().row(query_row) else {
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    // Stable, so ties stay in row order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .filter(|&(row, _)| row != query_row)
        .take(RECOMMENDATION_LIMIT)
        .filter_map(|(row, score)| {
            catalog.get(row).map(|movie| RecommendedMovie {
                title: movie.title.clone(),
                movie_id: movie.movie_id,
                score,
            })
        })
        .collect()
}

/// Recommendations decorated with posters.
///
/// Posters are fetched one after another; each failed lookup falls back to
/// the placeholder without affecting the others.
pub async fn recommend_with_posters(
    index: &SimilarityIndex,
    posters: &dyn PosterProvider,
    title: &str,
) -> Vec<Recommendation> {
    let ranked = recommend(index, title);
    let mut results = Vec::with_capacity(ranked.len());

    for movie in ranked {
        let poster_url = poster_or_placeholder(posters, movie.movie_id).await;
        results.push(Recommendation {
            title: movie.title,
            movie_id: movie.movie_id,
            poster_url,
        });
    }

    tracing::info!(query = title, count = results.len(), "Recommendations served");
    results
}

/// Uniformly sampled catalog title, `None` when the catalog is empty
pub fn random_pick(index: &SimilarityIndex) -> Option<String> {
    random_pick_with(index, &mut rand::thread_rng())
}

pub fn random_pick_with<R: Rng + ?Sized>(index: &SimilarityIndex, rng: &mut R) -> Option<String> {
    index.catalog().random_title(rng).map(str::to_string)
}
