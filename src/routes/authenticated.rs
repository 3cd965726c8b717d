use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Read-only catalog access for any caller presenting a valid `x-access-token`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /movies
        .route("/movies", get(handlers::get_all_movies))
        // GET /movies/{id}
        .route("/movies/{id}", get(handlers::get_one_movie))
        // GET /search?name=&director=&imdb_score=&99popularity=&genre=
        // All parameters optional and ANDed together.
        .route("/search", get(handlers::search_movies))
}
