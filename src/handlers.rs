use crate::{
    AppState,
    auth::{AdminClaims, Claims, password::verify_password},
    error::{AppError, MessageResponse},
    filter::{SearchCriteria, build_filters},
    models::{MovieListResponse, MovieRequest, MovieResponse, NewMovie, TokenResponse},
    validation::ValidatedJson,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
    typed_header::TypedHeaderRejection,
};

fn movie_not_found() -> AppError {
    AppError::NotFound("No movie found for entered id.".to_string())
}

// --- Public Handlers ---

/// home
///
/// [Public Route] Landing endpoint.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Home", body = MessageResponse))
)]
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Home Page.".to_string(),
    })
}

/// login
///
/// [Public Route] Exchanges HTTP Basic credentials for an access token.
///
/// *Flow*: missing or empty credentials → 401; unknown user name → 401 with a
/// distinct message; password mismatch → 403. On success the token embeds the
/// user's serialized projection and never expires.
#[utoipa::path(
    get,
    path = "/login",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Missing credentials or unknown user", body = MessageResponse),
        (status = 403, description = "Wrong password", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    credentials: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let TypedHeader(Authorization(basic)) = credentials.map_err(|_| AppError::MissingCredentials)?;
    if basic.username().is_empty() || basic.password().is_empty() {
        return Err(AppError::MissingCredentials);
    }

    let user = state
        .repo
        .find_user_by_name(basic.username())
        .await?
        .ok_or(AppError::UnknownUser)?;

    if !verify_password(basic.password(), &user.password_hash)? {
        tracing::info!(user = %user.name, "login rejected: password mismatch");
        return Err(AppError::BadCredentials);
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user = %user.name, admin = user.admin, "token issued");

    Ok(Json(TokenResponse { token }))
}

// --- Authenticated Handlers ---

/// get_all_movies
///
/// [Authenticated Route] Lists the whole catalog.
#[utoipa::path(
    get,
    path = "/movies",
    security(("access_token" = [])),
    responses(
        (status = 200, description = "All movies", body = MovieListResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    )
)]
pub async fn get_all_movies(
    _claims: Claims,
    State(state): State<AppState>,
) -> Result<Json<MovieListResponse>, AppError> {
    let movies = state.repo.query_movies(&[]).await?;
    Ok(Json(MovieListResponse {
        message: "Fetched all movies successfully.".to_string(),
        movies,
    }))
}

/// get_one_movie
///
/// [Authenticated Route] Retrieves a single movie by id.
#[utoipa::path(
    get,
    path = "/movies/{id}",
    security(("access_token" = [])),
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Found", body = MovieResponse),
        (status = 404, description = "Not Found", body = MessageResponse)
    )
)]
pub async fn get_one_movie(
    _claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state.repo.get_movie(id).await?.ok_or_else(movie_not_found)?;
    Ok(Json(MovieResponse {
        message: "Fetched movie by id successfully.".to_string(),
        movie,
    }))
}

/// search_movies
///
/// [Authenticated Route] Filters the catalog with optional query parameters.
///
/// The parameters are turned into predicates by `filter::build_filters` and
/// ANDed by the repository. No parameters returns every movie.
#[utoipa::path(
    get,
    path = "/search",
    security(("access_token" = [])),
    params(SearchCriteria),
    responses(
        (status = 200, description = "Matching movies (possibly none)", body = MovieListResponse),
        (status = 422, description = "Non-numeric popularity bound", body = MessageResponse)
    )
)]
pub async fn search_movies(
    _claims: Claims,
    State(state): State<AppState>,
    Query(criteria): Query<SearchCriteria>,
) -> Result<Json<MovieListResponse>, AppError> {
    let filters = build_filters(&criteria)?;
    tracing::debug!(predicates = filters.len(), "searching movies");

    let movies = state.repo.query_movies(&filters).await?;
    let message = if movies.is_empty() {
        "No movies found."
    } else {
        "Movies filtered successfully."
    };

    Ok(Json(MovieListResponse {
        message: message.to_string(),
        movies,
    }))
}

// --- Admin Handlers ---

/// add_movie
///
/// [Admin Route] Adds a movie. Names are unique: a second movie with the same
/// name is rejected with 409.
#[utoipa::path(
    post,
    path = "/movies",
    security(("access_token" = [])),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Created", body = MovieResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 409, description = "Duplicate name", body = MessageResponse),
        (status = 422, description = "Invalid body", body = MessageResponse)
    )
)]
pub async fn add_movie(
    admin: AdminClaims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    if state.repo.find_movie_by_name(&payload.name).await?.is_some() {
        return Err(AppError::Conflict("Movie already exist.".to_string()));
    }

    let movie = state.repo.create_movie(NewMovie::from(payload)).await?;
    tracing::info!(admin = %admin.user().name, movie_id = movie.id, "movie created");

    Ok(Json(MovieResponse {
        message: "New movie added successfully.".to_string(),
        movie,
    }))
}

/// update_movie
///
/// [Admin Route] Replaces every field of an existing movie.
/// Renaming onto another movie's name is rejected with 409.
#[utoipa::path(
    put,
    path = "/movies/{id}",
    security(("access_token" = [])),
    params(("id" = i64, Path, description = "Movie ID")),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Updated", body = MovieResponse),
        (status = 401, description = "Not an admin", body = MessageResponse),
        (status = 404, description = "Not Found", body = MessageResponse),
        (status = 409, description = "Name taken by another movie", body = MessageResponse),
        (status = 422, description = "Invalid body", body = MessageResponse)
    )
)]
pub async fn update_movie(
    admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state
        .repo
        .update_movie(id, NewMovie::from(payload))
        .await?
        .ok_or_else(movie_not_found)?;
    tracing::info!(admin = %admin.user().name, movie_id = id, "movie updated");

    Ok(Json(MovieResponse {
        message: "Movie data updated successfully.".to_string(),
        movie,
    }))
}

/// delete_movie
///
/// [Admin Route] Removes a movie and echoes the deleted record.
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    security(("access_token" = [])),
    params(("id" = i64, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Deleted", body = MovieResponse),
        (status = 404, description = "Not Found", body = MessageResponse)
    )
)]
pub async fn delete_movie(
    admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = state
        .repo
        .delete_movie(id)
        .await?
        .ok_or_else(movie_not_found)?;
    tracing::info!(admin = %admin.user().name, movie_id = id, "movie deleted");

    Ok(Json(MovieResponse {
        message: "Movie is deleted successfully.".to_string(),
        movie,
    }))
}
