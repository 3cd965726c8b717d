use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// Catalog mutations. Shares paths with the authenticated router but only
/// registers the mutating methods, so the two merge without overlap.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /movies
        .route("/movies", post(handlers::add_movie))
        // PUT/DELETE /movies/{id}
        .route(
            "/movies/{id}",
            put(handlers::update_movie).delete(handlers::delete_movie),
        )
}
