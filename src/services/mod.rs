use serde::{Deserialize, Serialize};

pub mod queries;
pub mod ranking;
pub mod recommendations;

pub use recommendations::{FallbackReason, RecommendationEngine, StrategyOutcome};

/// Where movie ranking is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Scoring, sorting and limiting are expressed in the Cypher query
    #[default]
    Pushdown,
    /// Raw candidates are fetched and ranked by [`ranking`]
    InProcess,
}
