use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinegraph_api::db::{GraphExecutor, GraphQuery, ParamValue, QueryError, Row, Rows};
use cinegraph_api::routes::{create_router, AppState};
use cinegraph_api::services::{RecommendationEngine, ScoringMode};

/// Answers queries by name with canned rows and records what was asked
#[derive(Default)]
struct StubExecutor {
    responses: HashMap<&'static str, Result<Vec<Value>, String>>,
    seen: Mutex<Vec<GraphQuery>>,
}

impl StubExecutor {
    fn respond(mut self, query: &'static str, values: Vec<Value>) -> Self {
        self.responses.insert(query, Ok(values));
        self
    }

    fn fail(mut self, query: &'static str) -> Self {
        self.responses
            .insert(query, Err(format!("{} unavailable", query)));
        self
    }
}

#[async_trait::async_trait]
impl GraphExecutor for StubExecutor {
    async fn execute(&self, query: &GraphQuery) -> Result<Rows, QueryError> {
        self.seen.lock().unwrap().push(query.clone());

        match self.responses.get(query.name) {
            Some(Ok(values)) => Ok(values
                .iter()
                .map(|value| {
                    let mut row = Row::new();
                    row.insert(query.column.to_string(), value.clone());
                    row
                })
                .collect()),
            Some(Err(message)) => Err(QueryError::Connection(message.clone())),
            None => Ok(vec![]),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn movie(id: &str, title: &str, score: f64, kind: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "year": 1999,
        "score": score,
        "genres": ["Action", "Sci-Fi"],
        "actors": ["Keanu Reeves"],
        "director": "Lana Wachowski",
        "recommendation_type": kind
    })
}

fn create_test_server(executor: Arc<StubExecutor>, mode: ScoringMode) -> TestServer {
    let state = AppState {
        engine: RecommendationEngine::new(executor, mode),
        default_limit: 10,
        max_limit: 100,
    };
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(StubExecutor::default()), ScoringMode::Pushdown);
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_content_based_recommendations() {
    let executor = Arc::new(StubExecutor::default().respond(
        "content_based_recommendations",
        vec![
            movie("m1", "The Matrix", 0.7, "content_based"),
            movie("m2", "Heat", 0.3, "content_based"),
        ],
    ));
    let server = create_test_server(executor.clone(), ScoringMode::Pushdown);

    let response = server.get("/api/v1/users/u1/recommendations").await;

    // Content-based results come back without touching the fallback
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["recommendation_type"], "content_based");
    assert_eq!(movies[0]["score"], 0.7);
    assert_eq!(movies[0]["director"], "Lana Wachowski");

    // Default limit and the path user id are bound as parameters
    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].params.get("limit"), Some(&ParamValue::Integer(10)));
    assert_eq!(
        seen[0].params.get("user_id"),
        Some(&ParamValue::Text("u1".to_string()))
    );
}

#[tokio::test]
async fn test_collaborator_failure_serves_popular_movies() {
    let executor = Arc::new(
        StubExecutor::default()
            .fail("content_based_recommendations")
            .respond("popular_movies", vec![movie("m3", "Alpha", 0.5, "popular")]),
    );
    let server = create_test_server(executor, ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/recommendations")
        .add_query_param("limit", 5)
        .await;

    // The failure stays server-side
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["recommendation_type"], "popular");
    assert_eq!(movies[0]["score"], 0.5);
}

#[tokio::test]
async fn test_total_failure_returns_empty_list() {
    let executor = Arc::new(
        StubExecutor::default()
            .fail("content_based_recommendations")
            .fail("popular_movies"),
    );
    let server = create_test_server(executor, ScoringMode::Pushdown);

    let response = server.get("/api/v1/users/u1/recommendations").await;

    // Both strategies failed, still a 200 with an empty list
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_in_process_scoring_end_to_end() {
    let preferences = json!([
        {"genre": "Action", "weight": 0.7},
        {"genre": "Drama", "weight": 0.3}
    ]);
    let candidate = |id: &str, title: &str, genres: Value| {
        json!({
            "id": id,
            "title": title,
            "year": 2000,
            "genres": genres,
            "actors": ["A", "B", "C"],
            "directors": [],
            "preferences": preferences.clone()
        })
    };
    let executor = Arc::new(StubExecutor::default().respond(
        "scoring_candidates",
        vec![
            candidate("M3", "Scream", json!(["Horror"])),
            candidate("M2", "Rain Man", json!(["Drama"])),
            candidate("M1", "Speed", json!(["Action", "Comedy"])),
        ],
    ));
    let server = create_test_server(executor, ScoringMode::InProcess);

    let response = server.get("/api/v1/users/U1/recommendations").await;

    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    // Scream shares no preferred genre and is dropped
    let ids: Vec<&str> = movies.iter().filter_map(|m| m["id"].as_str()).collect();
    assert_eq!(ids, vec!["M1", "M2"]);
    assert_eq!(movies[0]["actors"].as_array().unwrap().len(), 2);
    assert_eq!(movies[0]["director"], Value::Null);
}

#[tokio::test]
async fn test_invalid_limits_rejected() {
    let server = create_test_server(Arc::new(StubExecutor::default()), ScoringMode::Pushdown);

    let zero = server
        .get("/api/v1/users/u1/recommendations")
        .add_query_param("limit", 0)
        .await;
    zero.assert_status(StatusCode::BAD_REQUEST);

    let too_many = server
        .get("/api/v1/users/u1/recommendations")
        .add_query_param("limit", 101)
        .await;
    too_many.assert_status(StatusCode::BAD_REQUEST);
    // Error body carries the reason
    let body: Value = too_many.json();
    assert_eq!(body["error"], "limit must not exceed 100");
}

#[tokio::test]
async fn test_explanation_with_no_overlap() {
    let executor = Arc::new(StubExecutor::default().respond(
        "explanation",
        vec![json!({
            "movie": {"id": "m1", "title": "Heat"},
            "reasons": {"matched_genres": []}
        })],
    ));
    let server = create_test_server(executor, ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/movies/m1/explanation")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movie"]["title"], "Heat");
    assert_eq!(body["reasons"]["matched_genres"], json!([]));
}

#[tokio::test]
async fn test_explanation_with_matches() {
    let executor = Arc::new(StubExecutor::default().respond(
        "explanation",
        vec![json!({
            "movie": {"id": "m1", "title": "Heat"},
            "reasons": {"matched_genres": [{"genre": "Crime", "weight": 0.8}]}
        })],
    ));
    let server = create_test_server(executor, ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/movies/m1/explanation")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["reasons"]["matched_genres"],
        json!([{"genre": "Crime", "weight": 0.8}])
    );
}

#[tokio::test]
async fn test_numeric_movie_id_explained() {
    let executor = Arc::new(StubExecutor::default().respond(
        "explanation",
        vec![json!({
            "movie": {"id": 603, "title": "The Matrix"},
            "reasons": {"matched_genres": [{"genre": "Action", "weight": 0.8}]}
        })],
    ));
    let server = create_test_server(executor.clone(), ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/movies/603/explanation")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movie"]["id"], 603);

    // The path segment is bound as an integer so integer-keyed movies match
    let seen = executor.seen.lock().unwrap();
    assert_eq!(seen[0].params.get("movie_id"), Some(&ParamValue::Integer(603)));
    assert_eq!(
        seen[0].params.get("user_id"),
        Some(&ParamValue::Text("u1".to_string()))
    );
}

#[tokio::test]
async fn test_explanation_for_unknown_movie_is_not_found() {
    // No row from the graph means the user or the movie is missing
    let server = create_test_server(Arc::new(StubExecutor::default()), ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/movies/missing/explanation")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explanation_failure_is_bad_gateway() {
    let executor = Arc::new(StubExecutor::default().fail("explanation"));
    let server = create_test_server(executor, ScoringMode::Pushdown);

    let response = server
        .get("/api/v1/users/u1/movies/m1/explanation")
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server(Arc::new(StubExecutor::default()), ScoringMode::Pushdown);
    let request_id = "0b6f1f0e-8f3e-4d5b-9a0c-2f1e3d4c5b6a";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(request_id),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), request_id);
}
