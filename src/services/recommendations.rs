use serde::de::DeserializeOwned;
use std::{fmt::Display, sync::Arc};
use tracing::instrument;

use crate::{
    db::{GraphExecutor, QueryError, Rows},
    models::{Explanation, MovieCandidate, MovieRecommendation, NodeId},
    services::{
        queries::{self, CANDIDATE_COLUMN, EXPLANATION_COLUMN, MOVIE_COLUMN},
        ranking, ScoringMode,
    },
};

pub const DEFAULT_LIMIT: usize = 10;

/// Why the content-based strategy handed over to the popularity strategy
#[derive(Debug)]
pub enum FallbackReason {
    /// The query succeeded but nothing scored above zero
    Empty,
    /// The graph collaborator failed or returned malformed rows
    Failed(QueryError),
}

impl Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Empty => write!(f, "no preference-based recommendations"),
            FallbackReason::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// Result of the content-based strategy
#[derive(Debug)]
pub enum StrategyOutcome {
    Recommendations(Vec<MovieRecommendation>),
    FallbackTriggered(FallbackReason),
}

impl From<Result<Vec<MovieRecommendation>, QueryError>> for StrategyOutcome {
    fn from(result: Result<Vec<MovieRecommendation>, QueryError>) -> Self {
        match result {
            Ok(movies) if movies.is_empty() => {
                StrategyOutcome::FallbackTriggered(FallbackReason::Empty)
            }
            Ok(movies) => StrategyOutcome::Recommendations(movies),
            Err(e) => StrategyOutcome::FallbackTriggered(FallbackReason::Failed(e)),
        }
    }
}

/// Recommends unseen movies to users of the movie graph
///
/// Tries a content-based ranking over the user's genre preference weights first
/// and falls back to a popularity ranking when that yields nothing or fails.
/// Recommendation calls never fail; the worst outcome is an empty list.
#[derive(Clone)]
pub struct RecommendationEngine {
    executor: Arc<dyn GraphExecutor>,
    scoring_mode: ScoringMode,
}

impl RecommendationEngine {
    pub fn new(executor: Arc<dyn GraphExecutor>, scoring_mode: ScoringMode) -> Self {
        Self {
            executor,
            scoring_mode,
        }
    }

    /// Returns at most `limit` movies the user has not interacted with
    #[instrument(skip(self), fields(executor = self.executor.name(), mode = ?self.scoring_mode))]
    pub async fn get_recommendations_for_user(
        &self,
        user_id: &NodeId,
        limit: usize,
    ) -> Vec<MovieRecommendation> {
        if user_id.is_blank() {
            tracing::warn!("Empty user id, no recommendations");
            return vec![];
        }

        tracing::debug!("Searching recommendations for user");

        // Preference-based ranking first, popularity only when it gives nothing
        match self.content_based(user_id, limit).await {
            StrategyOutcome::Recommendations(movies) => {
                tracing::debug!(
                    found = movies.len(),
                    first = ?movies.first(),
                    "Content-based recommendations found"
                );
                movies
            }
            StrategyOutcome::FallbackTriggered(reason) => {
                match &reason {
                    FallbackReason::Empty => {
                        tracing::debug!(reason = %reason, "Using popular movies")
                    }
                    FallbackReason::Failed(e) => {
                        tracing::error!(error = %e, "Content-based recommendations failed, using popular movies")
                    }
                }
                self.popular_movies(user_id, limit).await
            }
        }
    }

    /// Ranks unseen movies by the summed weight of the user's preferred genres
    pub async fn content_based(&self, user_id: &NodeId, limit: usize) -> StrategyOutcome {
        self.try_content_based(user_id, limit).await.into()
    }

    /// Ranks unseen movies by metadata richness
    ///
    /// Terminal fallback: any collaborator failure yields an empty list.
    #[instrument(skip(self), fields(mode = ?self.scoring_mode))]
    pub async fn popular_movies(&self, user_id: &NodeId, limit: usize) -> Vec<MovieRecommendation> {
        tracing::debug!("Searching popular movies for user");

        match self.try_popular(user_id, limit).await {
            Ok(movies) => {
                tracing::debug!(
                    found = movies.len(),
                    first = ?movies.first(),
                    "Popular movies found"
                );
                movies
            }
            Err(e) => {
                tracing::error!(error = %e, "Popular movies lookup failed");
                vec![]
            }
        }
    }

    /// Looks up the preferred genres a movie shares with the user
    ///
    /// `Ok(None)` means the user or the movie does not exist. A movie with no
    /// genre overlap still yields an explanation with no matches.
    #[instrument(skip(self))]
    pub async fn get_explanation_for_recommendation(
        &self,
        user_id: &NodeId,
        movie_id: &NodeId,
    ) -> Result<Option<Explanation>, QueryError> {
        if user_id.is_blank() || movie_id.is_blank() {
            return Ok(None);
        }

        let rows = self
            .executor
            .execute(&queries::explanation(user_id, movie_id))
            .await?;

        // Zero rows: the user or the movie is missing
        let explanation = decode_column::<Explanation>(rows, EXPLANATION_COLUMN)?
            .into_iter()
            .next();

        tracing::debug!(
            found = explanation.is_some(),
            matches = explanation
                .as_ref()
                .map_or(0, |e| e.reasons.matched_genres.len()),
            "Explanation lookup finished"
        );

        Ok(explanation)
    }

    async fn try_content_based(
        &self,
        user_id: &NodeId,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>, QueryError> {
        match self.scoring_mode {
            ScoringMode::Pushdown => {
                let query = queries::content_based_recommendations(user_id, limit);
                let rows = self.executor.execute(&query).await?;
                decode_ranked(rows, limit)
            }
            ScoringMode::InProcess => {
                let query = queries::scoring_candidates(user_id);
                let rows = self.executor.execute(&query).await?;
                let candidates: Vec<MovieCandidate> = decode_column(rows, CANDIDATE_COLUMN)?;
                // Every row repeats the same preferences
                let preferences = candidates
                    .first()
                    .map(|c| c.preferences.clone())
                    .unwrap_or_default();
                Ok(ranking::rank_content_based(&preferences, candidates, limit))
            }
        }
    }

    async fn try_popular(
        &self,
        user_id: &NodeId,
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>, QueryError> {
        match self.scoring_mode {
            ScoringMode::Pushdown => {
                let query = queries::popular_movies(user_id, limit);
                let rows = self.executor.execute(&query).await?;
                decode_ranked(rows, limit)
            }
            ScoringMode::InProcess => {
                let query = queries::unseen_candidates(user_id);
                let rows = self.executor.execute(&query).await?;
                let candidates: Vec<MovieCandidate> = decode_column(rows, CANDIDATE_COLUMN)?;
                Ok(ranking::rank_popular(candidates, limit))
            }
        }
    }
}

fn decode_ranked(rows: Rows, limit: usize) -> Result<Vec<MovieRecommendation>, QueryError> {
    let mut movies: Vec<MovieRecommendation> = decode_column(rows, MOVIE_COLUMN)?;
    // The query limits too, but the cap must hold whatever the server returns
    movies.truncate(limit);
    Ok(movies)
}

/// Decodes the value under `column` of every row; rows without it are skipped
fn decode_column<T: DeserializeOwned>(rows: Rows, column: &str) -> Result<Vec<T>, QueryError> {
    rows.into_iter()
        .filter_map(|mut row| row.remove(column))
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| QueryError::Decode(format!("column `{}`: {}", column, e)))
        })
        .collect()
}
