use serde::{Deserialize, Deserializer, Serialize};
use std::{convert::Infallible, fmt::Display, str::FromStr};

pub mod explanation;
pub mod movie;

pub use explanation::{ExplainedMovie, Explanation, ExplanationReasons};
pub use movie::{MovieCandidate, MovieRecommendation, RecommendationType};

/// Identifier of a graph node, stored either as an integer or a string property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl NodeId {
    /// True for text ids that are empty or whitespace only
    pub fn is_blank(&self) -> bool {
        matches!(self, NodeId::Text(id) if id.trim().is_empty())
    }
}

/// Parses an id from a URL segment: integer literals become `Number`, anything
/// else `Text`, so ids returned in recommendation records round-trip.
impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(number) => NodeId::Number(number),
            Err(_) => NodeId::Text(trimmed.to_string()),
        })
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Number(id) => write!(f, "{}", id),
            NodeId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A genre paired with a user's preference weight for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreWeight {
    pub genre: String,
    pub weight: f64,
}

#[derive(Deserialize)]
struct NullableGenreWeight {
    genre: Option<String>,
    weight: Option<f64>,
}

/// Deserializes a list of `{genre, weight}` maps, skipping incomplete entries.
///
/// An OPTIONAL MATCH that finds nothing still collects one map whose fields are
/// all null, so those entries have to be dropped here.
pub(crate) fn deserialize_genre_weights<'de, D>(deserializer: D) -> Result<Vec<GenreWeight>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<NullableGenreWeight>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match (entry.genre, entry.weight) {
            (Some(genre), Some(weight)) => Some(GenreWeight { genre, weight }),
            _ => None,
        })
        .collect())
}

/// Deserializes a possibly-null list of names, dropping null members
pub(crate) fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}
