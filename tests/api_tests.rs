use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use movie_recommender::{
    index::SimilarityIndex,
    models::{Movie, MovieId},
    routes::{create_router, AppState},
    services::posters::{TmdbPosterProvider, DEFAULT_PLACEHOLDER_URL},
};

fn sample_index() -> SimilarityIndex {
    SimilarityIndex::build(vec![
        Movie::new(Some(MovieId(1)), "Alpha", "space adventure"),
        Movie::new(Some(MovieId(2)), "Beta", "space war"),
        Movie::new(None, "Gamma", "romance drama"),
    ])
}

fn create_test_server(index: SimilarityIndex) -> TestServer {
    // No API key, so every poster is the placeholder and nothing leaves the process
    let posters = TmdbPosterProvider::new(
        None,
        "http://127.0.0.1:1",
        "https://image.tmdb.org/t/p/w500",
        Duration::from_secs(1),
    )
    .unwrap();
    let state = AppState::new(index, Arc::new(posters));
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(sample_index());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_size"], 3);
}

#[tokio::test]
async fn test_list_titles_in_catalog_order() {
    let server = create_test_server(sample_index());
    let response = server.get("/api/v1/titles").await;
    response.assert_status_ok();
    let titles: Vec<String> = response.json();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn test_random_title_comes_from_catalog() {
    let server = create_test_server(sample_index());
    let response = server.get("/api/v1/titles/random").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let title = body["title"].as_str().unwrap();
    assert!(["Alpha", "Beta", "Gamma"].contains(&title));
}

#[tokio::test]
async fn test_recommendations_ranked_with_placeholders() {
    let server = create_test_server(sample_index());
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Alpha")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "Alpha");
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["title"], "Beta");
    assert_eq!(recommendations[0]["movie_id"], 2);
    assert_eq!(recommendations[1]["title"], "Gamma");
    assert_eq!(recommendations[1]["movie_id"], Value::Null);
    for rec in recommendations {
        assert_eq!(rec["poster_url"], DEFAULT_PLACEHOLDER_URL);
    }
}

#[tokio::test]
async fn test_unknown_title_returns_empty_list() {
    let server = create_test_server(sample_index());
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Delta")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_title_is_a_json_error() {
    let server = create_test_server(sample_index());
    let response = server.get("/api/v1/recommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "title is required");
}

#[tokio::test]
async fn test_every_listed_title_can_be_recommended() {
    // A CSV row without a title ends up in the catalog as ""
    let server = create_test_server(SimilarityIndex::build(vec![
        Movie::new(Some(MovieId(1)), "Alpha", "space adventure"),
        Movie::new(Some(MovieId(2)), "", "space war"),
        Movie::new(None, "Gamma", "romance drama"),
    ]));

    let titles: Vec<String> = server.get("/api/v1/titles").await.json();
    assert_eq!(titles, vec!["Alpha", "", "Gamma"]);

    for title in &titles {
        let response = server
            .get("/api/v1/recommendations")
            .add_query_param("title", title)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["query"], title.as_str());
        let recommendations = body["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 2);
        assert!(recommendations.iter().all(|r| r["title"] != title.as_str()));
    }

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "")
        .await;
    let body: Value = response.json();
    assert_eq!(body["recommendations"][0]["title"], "Alpha");
}

#[tokio::test]
async fn test_empty_catalog_refuses_catalog_endpoints() {
    let server = create_test_server(SimilarityIndex::empty());

    for path in ["/api/v1/titles", "/api/v1/titles/random"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("No movie data available"));
    }

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Anything")
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    server.get("/health").await.assert_status_ok();
}
