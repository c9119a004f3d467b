//! Cypher statements issued by the recommendation engine.
//!
//! Graph schema: `(:User)-[:USER_GENRE_PREFERENCE {peso}]->(:Genre)`,
//! `(:User)-[:INTERACTED]->(:Movie)`, and `(:Movie)` linked to `(:Genre)`,
//! `(:Actor)` and `(:Director)` through `HAS_GENRE`, `HAS_ACTOR` and
//! `DIRECTED_BY`.

use crate::{db::GraphQuery, models::NodeId};

pub const MOVIE_COLUMN: &str = "movie";
pub const CANDIDATE_COLUMN: &str = "candidate";
pub const EXPLANATION_COLUMN: &str = "explanation";

const CONTENT_BASED_RECOMMENDATIONS: &str = r#"
MATCH (u:User {id: $user_id})
OPTIONAL MATCH (u)-[pg:USER_GENRE_PREFERENCE]->(pref:Genre)
WITH u, COLLECT({genre: pref.name, weight: pg.peso}) AS user_genres
MATCH (m:Movie)
WHERE NOT EXISTS { (u)-[:INTERACTED]->(m) }
OPTIONAL MATCH (m)-[:HAS_GENRE]->(mg:Genre)
WITH m, user_genres, COLLECT(DISTINCT mg.name) AS movie_genres
WITH m, movie_genres,
     REDUCE(score = 0.0, user_pref IN user_genres |
       CASE WHEN user_pref.genre IN movie_genres AND user_pref.weight IS NOT NULL
            THEN score + user_pref.weight
            ELSE score
       END
     ) AS preference_score
WHERE preference_score > 0
OPTIONAL MATCH (m)-[:HAS_ACTOR]->(a:Actor)
OPTIONAL MATCH (m)-[:DIRECTED_BY]->(d:Director)
WITH m, movie_genres, preference_score,
     COLLECT(DISTINCT a.name) AS actors,
     COLLECT(DISTINCT d.name) AS directors
RETURN {
    id: m.id,
    title: m.title,
    year: m.year,
    score: round(preference_score * 100) / 100,
    genres: movie_genres[0..3],
    actors: actors[0..2],
    director: directors[0],
    recommendation_type: 'content_based'
} AS movie
ORDER BY preference_score DESC
LIMIT $limit
"#;

const POPULAR_MOVIES: &str = r#"
MATCH (u:User {id: $user_id})
MATCH (m:Movie)
WHERE NOT EXISTS { (u)-[:INTERACTED]->(m) }
OPTIONAL MATCH (m)-[:HAS_GENRE]->(g:Genre)
OPTIONAL MATCH (m)-[:HAS_ACTOR]->(a:Actor)
OPTIONAL MATCH (m)-[:DIRECTED_BY]->(d:Director)
WITH m,
     COUNT(DISTINCT g) + COUNT(DISTINCT a) + COUNT(DISTINCT d) AS popularity_score,
     COLLECT(DISTINCT g.name) AS genres,
     COLLECT(DISTINCT a.name) AS actors,
     COLLECT(DISTINCT d.name) AS directors
WHERE popularity_score > 0
RETURN {
    id: m.id,
    title: m.title,
    year: m.year,
    score: 0.5,
    genres: genres[0..3],
    actors: actors[0..2],
    director: directors[0],
    recommendation_type: 'popular'
} AS movie
ORDER BY popularity_score DESC, m.title ASC
LIMIT $limit
"#;

const SCORING_CANDIDATES: &str = r#"
MATCH (u:User {id: $user_id})
OPTIONAL MATCH (u)-[pg:USER_GENRE_PREFERENCE]->(pref:Genre)
WITH u, COLLECT({genre: pref.name, weight: pg.peso}) AS preferences
MATCH (m:Movie)
WHERE NOT EXISTS { (u)-[:INTERACTED]->(m) }
OPTIONAL MATCH (m)-[:HAS_GENRE]->(g:Genre)
OPTIONAL MATCH (m)-[:HAS_ACTOR]->(a:Actor)
OPTIONAL MATCH (m)-[:DIRECTED_BY]->(d:Director)
WITH preferences, m,
     COLLECT(DISTINCT g.name) AS genres,
     COLLECT(DISTINCT a.name) AS actors,
     COLLECT(DISTINCT d.name) AS directors
RETURN {
    id: m.id,
    title: m.title,
    year: m.year,
    genres: genres,
    actors: actors,
    directors: directors,
    preferences: preferences
} AS candidate
"#;

const UNSEEN_CANDIDATES: &str = r#"
MATCH (u:User {id: $user_id})
MATCH (m:Movie)
WHERE NOT EXISTS { (u)-[:INTERACTED]->(m) }
OPTIONAL MATCH (m)-[:HAS_GENRE]->(g:Genre)
OPTIONAL MATCH (m)-[:HAS_ACTOR]->(a:Actor)
OPTIONAL MATCH (m)-[:DIRECTED_BY]->(d:Director)
WITH m,
     COLLECT(DISTINCT g.name) AS genres,
     COLLECT(DISTINCT a.name) AS actors,
     COLLECT(DISTINCT d.name) AS directors
RETURN {
    id: m.id,
    title: m.title,
    year: m.year,
    genres: genres,
    actors: actors,
    directors: directors
} AS candidate
"#;

const EXPLANATION: &str = r#"
MATCH (u:User {id: $user_id}), (m:Movie {id: $movie_id})
OPTIONAL MATCH (u)-[pg:USER_GENRE_PREFERENCE]->(g:Genre)<-[:HAS_GENRE]-(m)
WITH m, COLLECT({genre: g.name, weight: pg.peso}) AS matches
RETURN {
    movie: {id: m.id, title: m.title},
    reasons: {
        matched_genres: [entry IN matches WHERE entry.genre IS NOT NULL]
    }
} AS explanation
"#;

/// Unseen movies scored, filtered, sorted and limited by the database
pub fn content_based_recommendations(user_id: &NodeId, limit: usize) -> GraphQuery {
    GraphQuery::new("content_based_recommendations", CONTENT_BASED_RECOMMENDATIONS, MOVIE_COLUMN)
        .param("user_id", user_id)
        .param("limit", limit)
}

/// Unseen movies ranked by metadata richness, by the database
pub fn popular_movies(user_id: &NodeId, limit: usize) -> GraphQuery {
    GraphQuery::new("popular_movies", POPULAR_MOVIES, MOVIE_COLUMN)
        .param("user_id", user_id)
        .param("limit", limit)
}

/// Every unseen movie plus the user's genre preferences, unranked
pub fn scoring_candidates(user_id: &NodeId) -> GraphQuery {
    GraphQuery::new("scoring_candidates", SCORING_CANDIDATES, CANDIDATE_COLUMN)
        .param("user_id", user_id)
}

/// Every unseen movie, unranked
pub fn unseen_candidates(user_id: &NodeId) -> GraphQuery {
    GraphQuery::new("unseen_candidates", UNSEEN_CANDIDATES, CANDIDATE_COLUMN)
        .param("user_id", user_id)
}

/// Preferred genres shared by one user and one movie; no row when either is missing
pub fn explanation(user_id: &NodeId, movie_id: &NodeId) -> GraphQuery {
    GraphQuery::new("explanation", EXPLANATION, EXPLANATION_COLUMN)
        .param("user_id", user_id)
        .param("movie_id", movie_id)
}
