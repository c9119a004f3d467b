use serde::{Deserialize, Serialize};

use super::{deserialize_genre_weights, deserialize_names, GenreWeight, NodeId};

/// Which strategy produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    /// Ranked by the user's genre preference weights
    ContentBased,
    /// Ranked by how much metadata the movie carries
    Popular,
}

/// A movie recommended to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecommendation {
    pub id: NodeId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    /// Displayed score, rounded to two decimals
    pub score: f64,
    /// At most three genre names
    #[serde(default, deserialize_with = "deserialize_names")]
    pub genres: Vec<String>,
    /// At most two actor names
    #[serde(default, deserialize_with = "deserialize_names")]
    pub actors: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    pub recommendation_type: RecommendationType,
}

/// An unranked movie the user has not interacted with, with its full metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MovieCandidate {
    pub id: NodeId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub actors: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub directors: Vec<String>,
    /// The requesting user's genre preferences, repeated on every row of the
    /// content-based candidate query
    #[serde(default, deserialize_with = "deserialize_genre_weights")]
    pub preferences: Vec<GenreWeight>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendation_type_serialization() {
        assert_eq!(
            serde_json::to_string(&RecommendationType::ContentBased).unwrap(),
            "\"content_based\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendationType::Popular).unwrap(),
            "\"popular\""
        );
    }

    #[test]
    fn test_recommendation_from_graph_map() {
        let movie: MovieRecommendation = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "year": 1999,
            "score": 0.7,
            "genres": ["Action", "Sci-Fi"],
            "actors": ["Keanu Reeves", "Carrie-Anne Moss"],
            "director": null,
            "recommendation_type": "content_based"
        }))
        .unwrap();

        assert_eq!(movie.id, NodeId::Number(603));
        assert_eq!(movie.title.as_deref(), Some("The Matrix"));
        assert_eq!(movie.year, Some(1999));
        assert_eq!(movie.director, None);
        assert_eq!(movie.recommendation_type, RecommendationType::ContentBased);
    }

    #[test]
    fn test_recommendation_serializes_null_director() {
        let movie = MovieRecommendation {
            id: NodeId::Text("m1".to_string()),
            title: Some("Heat".to_string()),
            year: Some(1995),
            score: 0.5,
            genres: vec!["Crime".to_string()],
            actors: vec![],
            director: None,
            recommendation_type: RecommendationType::Popular,
        };

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["director"], serde_json::Value::Null);
        assert_eq!(value["recommendation_type"], "popular");
        assert_eq!(value["score"], 0.5);
    }

    #[test]
    fn test_candidate_without_preferences() {
        let candidate: MovieCandidate = serde_json::from_value(json!({
            "id": "m2",
            "title": "Alien",
            "year": 1979,
            "genres": ["Horror"],
            "actors": [],
            "directors": ["Ridley Scott"]
        }))
        .unwrap();

        assert!(candidate.preferences.is_empty());
        assert_eq!(candidate.directors, vec!["Ridley Scott".to_string()]);
    }
}
