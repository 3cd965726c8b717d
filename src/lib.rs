use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod validation;

// Routing segregation (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::{TokenService, TokenState};
pub use config::AppConfig;
pub use error::AppError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home, handlers::login, handlers::get_all_movies, handlers::get_one_movie,
        handlers::search_movies, handlers::add_movie, handlers::update_movie,
        handlers::delete_movie
    ),
    components(
        schemas(
            models::Movie, models::MovieRequest, models::MovieResponse,
            models::MovieListResponse, models::TokenResponse, models::UserClaim,
            error::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "movie-catalog", description = "Movie Catalog API")
    )
)]
struct ApiDoc;

/// Registers the two credential schemes: Basic for `/login`, the
/// `x-access-token` header for everything else.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(auth::TOKEN_HEADER))),
            );
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

/// AppState
///
/// The single, immutable container shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Token issuance/verification, holding the signing secret.
    pub tokens: TokenState,
    /// The loaded configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors pull only the component they need. `Claims` and
// `AdminClaims` depend on `TokenState` alone.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenState {
    fn from_ref(app_state: &AppState) -> TokenState {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the global layers and registers the state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line of a request carries its
/// `x-request-id`. The token header is never recorded.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
