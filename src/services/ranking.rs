//! In-process ranking of unseen movie candidates.
//!
//! Mirrors the Cypher ranking queries so the same results can be produced from
//! raw candidate rows when scoring runs outside the database.

use std::cmp::Ordering;

use crate::models::{GenreWeight, MovieCandidate, MovieRecommendation, RecommendationType};

pub const MAX_GENRES: usize = 3;
pub const MAX_ACTORS: usize = 2;
pub const POPULAR_DISPLAY_SCORE: f64 = 0.5;

/// Ranks candidates by the summed weight of the preferred genres they carry.
///
/// Candidates scoring zero or less are dropped. Equal scores keep candidate order.
pub fn rank_content_based(
    preferences: &[GenreWeight],
    candidates: Vec<MovieCandidate>,
    limit: usize,
) -> Vec<MovieRecommendation> {
    let mut scored: Vec<(f64, MovieCandidate)> = candidates
        .into_iter()
        .map(|candidate| (preference_score(preferences, &candidate.genres), candidate))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    // Stable sort on the unrounded score
    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    scored
        .into_iter()
        .take(limit)
        .map(|(raw, candidate)| {
            into_recommendation(candidate, round_score(raw), RecommendationType::ContentBased)
        })
        .collect()
}

/// Ranks candidates by metadata richness, ties broken by ascending title.
///
/// Every record shows the same fixed score; popularity only orders them.
pub fn rank_popular(candidates: Vec<MovieCandidate>, limit: usize) -> Vec<MovieRecommendation> {
    let mut scored: Vec<(usize, MovieCandidate)> = candidates
        .into_iter()
        .map(|candidate| (popularity_score(&candidate), candidate))
        .filter(|(score, _)| *score > 0)
        .collect();

    // Most metadata first, then title ascending
    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| compare_titles(a.title.as_deref(), b.title.as_deref()))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| {
            into_recommendation(candidate, POPULAR_DISPLAY_SCORE, RecommendationType::Popular)
        })
        .collect()
}

/// Sum of weights for every preference whose genre the movie has
pub fn preference_score(preferences: &[GenreWeight], movie_genres: &[String]) -> f64 {
    preferences
        .iter()
        .filter(|pref| movie_genres.contains(&pref.genre))
        .map(|pref| pref.weight)
        .sum()
}

/// Distinct genres + distinct actors + distinct directors
pub fn popularity_score(candidate: &MovieCandidate) -> usize {
    distinct(&candidate.genres).len()
        + distinct(&candidate.actors).len()
        + distinct(&candidate.directors).len()
}

pub fn round_score(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}

// Titleless movies sort after titled ones, as null does in Cypher.
fn compare_titles(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// First-seen order, duplicates removed
fn distinct(names: &[String]) -> Vec<&String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

fn into_recommendation(
    candidate: MovieCandidate,
    score: f64,
    recommendation_type: RecommendationType,
) -> MovieRecommendation {
    let genres = distinct(&candidate.genres)
        .into_iter()
        .take(MAX_GENRES)
        .cloned()
        .collect();
    let actors = distinct(&candidate.actors)
        .into_iter()
        .take(MAX_ACTORS)
        .cloned()
        .collect();

    MovieRecommendation {
        id: candidate.id,
        title: candidate.title,
        year: candidate.year,
        score,
        genres,
        actors,
        director: candidate.directors.into_iter().next(),
        recommendation_type,
    }
}
