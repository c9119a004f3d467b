use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::RecommendationEngine,
};

pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub engine: RecommendationEngine,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, config: &Config) -> Self {
        Self {
            engine,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    /// Applies the default limit and rejects limits outside `1..=max_limit`
    pub fn resolve_limit(&self, requested: Option<usize>) -> AppResult<usize> {
        match requested.unwrap_or(self.default_limit) {
            0 => Err(AppError::InvalidInput(
                "limit must be a positive integer".to_string(),
            )),
            limit if limit > self.max_limit => Err(AppError::InvalidInput(format!(
                "limit must not exceed {}",
                self.max_limit
            ))),
            limit => Ok(limit),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        .route(
            "/users/:user_id/movies/:movie_id/explanation",
            get(recommendations::explain),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
