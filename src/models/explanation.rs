use serde::{Deserialize, Serialize};

use super::{deserialize_genre_weights, GenreWeight, NodeId};

/// Why a movie was recommended to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub movie: ExplainedMovie,
    pub reasons: ExplanationReasons,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplainedMovie {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplanationReasons {
    /// Genres both preferred by the user and attached to the movie
    #[serde(default, deserialize_with = "deserialize_genre_weights")]
    pub matched_genres: Vec<GenreWeight>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explanation_without_overlap_keeps_movie() {
        let explanation: Explanation = serde_json::from_value(json!({
            "movie": {"id": "m9", "title": "Up"},
            "reasons": {"matched_genres": [{"genre": null, "weight": null}]}
        }))
        .unwrap();

        assert_eq!(explanation.movie.id, Some(NodeId::Text("m9".to_string())));
        assert!(explanation.reasons.matched_genres.is_empty());
        assert_eq!(
            serde_json::to_value(&explanation).unwrap()["reasons"]["matched_genres"],
            json!([])
        );
    }

    #[test]
    fn test_explanation_with_matches() {
        let explanation: Explanation = serde_json::from_value(json!({
            "movie": {"id": 1, "title": "Heat"},
            "reasons": {"matched_genres": [
                {"genre": "Crime", "weight": 0.9},
                {"genre": "Drama", "weight": 0.2}
            ]}
        }))
        .unwrap();

        assert_eq!(explanation.reasons.matched_genres.len(), 2);
        assert_eq!(explanation.reasons.matched_genres[0].genre, "Crime");
    }
}
