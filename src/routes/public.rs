use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        .route("/", get(handlers::home))
        // GET /health
        // Liveness check for load balancers. Never touches the database.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // HTTP Basic credentials in, `{ "token": ... }` out.
        .route("/login", get(handlers::login))
}
