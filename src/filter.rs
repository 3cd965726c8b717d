use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppError, models::Movie};

/// SearchCriteria
///
/// Query parameters accepted by `GET /search`. Every field is optional; empty
/// strings count as absent.
///
/// Note the legacy `imdb_score` parameter: it is a lower bound on **popularity**,
/// not on the IMDB score column. Existing clients depend on that, so it stays.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchCriteria {
    /// Substring of the movie name (case-insensitive).
    pub name: Option<String>,
    /// Substring of the director (case-insensitive).
    pub director: Option<String>,
    /// Lower bound on popularity (legacy name).
    pub imdb_score: Option<String>,
    /// Lower bound on popularity.
    #[serde(rename = "99popularity")]
    pub popularity: Option<String>,
    /// Comma-separated genres; every listed genre must match.
    pub genre: Option<String>,
}

/// Predicate
///
/// A single condition over `Movie` records. A search is the logical AND of a
/// `Vec<Predicate>`; an empty list matches everything.
///
/// No predicate targets the `imdb_score` column; see `SearchCriteria`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    NameContains(String),
    DirectorContains(String),
    GenreContains(String),
    PopularityAtLeast(f64),
}

impl Predicate {
    /// In-process evaluation, used by the in-memory repository. Mirrors the SQL
    /// rendering in `PostgresRepository` (case-insensitive substring, `>=`).
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Predicate::NameContains(needle) => contains_ci(&movie.name, needle),
            Predicate::DirectorContains(needle) => contains_ci(&movie.director, needle),
            Predicate::GenreContains(needle) => contains_ci(&movie.genre, needle),
            Predicate::PopularityAtLeast(bound) => movie.popularity >= *bound,
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Wraps a user supplied substring as a `LIKE` pattern, escaping `%`, `_` and `\`
/// so they match literally.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// build_filters
///
/// Translates search criteria into an ordered predicate list:
///
/// 1. `name` → name substring
/// 2. `director` → director substring
/// 3. `imdb_score` → popularity ≥ value
/// 4. `99popularity` → popularity ≥ value (independent of 3; both may be emitted)
/// 5. `genre` → one genre substring per trimmed, non-empty comma-separated token
///
/// Fails with `AppError::Validation` when a numeric bound does not parse.
pub fn build_filters(criteria: &SearchCriteria) -> Result<Vec<Predicate>, AppError> {
    let mut filters = Vec::new();

    if let Some(name) = present(&criteria.name) {
        filters.push(Predicate::NameContains(name.to_string()));
    }

    if let Some(director) = present(&criteria.director) {
        filters.push(Predicate::DirectorContains(director.to_string()));
    }

    if let Some(raw) = present(&criteria.imdb_score) {
        filters.push(Predicate::PopularityAtLeast(parse_bound("imdb_score", raw)?));
    }

    if let Some(raw) = present(&criteria.popularity) {
        filters.push(Predicate::PopularityAtLeast(parse_bound("99popularity", raw)?));
    }

    if let Some(genre) = present(&criteria.genre) {
        filters.extend(
            genre
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| Predicate::GenreContains(token.to_string())),
        );
    }

    Ok(filters)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_bound(param: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", param)))
}
