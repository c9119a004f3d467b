use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Explanation, MovieRecommendation, NodeId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Handler for the recommendations endpoint
///
/// Collaborator failures never reach the client; they degrade to the popularity
/// ranking or an empty list.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<MovieRecommendation>>> {
    let user_id = required_id("user_id", &user_id)?;
    let limit = state.resolve_limit(params.limit)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        limit,
        "Processing recommendation request"
    );

    let movies = state
        .engine
        .get_recommendations_for_user(&user_id, limit)
        .await;

    tracing::info!(
        request_id = %request_id,
        count = movies.len(),
        "Recommendations completed"
    );

    Ok(Json(movies))
}

/// Handler for the recommendation explanation endpoint
pub async fn explain(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, movie_id)): Path<(String, String)>,
) -> AppResult<Json<Explanation>> {
    let user_id = required_id("user_id", &user_id)?;
    let movie_id = required_id("movie_id", &movie_id)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        movie_id = %movie_id,
        "Processing explanation request"
    );

    state
        .engine
        .get_explanation_for_recommendation(&user_id, &movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No explanation available for movie {} and user {}",
                movie_id, user_id
            ))
        })
}

/// Parses a path segment into a node id; integer literals bind as integers
fn required_id(name: &str, value: &str) -> AppResult<NodeId> {
    let id = match value.parse::<NodeId>() {
        Ok(id) => id,
        Err(never) => match never {},
    };
    if id.is_blank() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(id)
}
