use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Account record from the `users` table. The password hash never leaves the
/// server: tokens and responses carry the `UserClaim` projection instead.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    // RBAC flag: admins may create, update and delete movies.
    pub admin: bool,
}

/// UserClaim
///
/// Serialized projection of a `User` without the password hash. This is exactly
/// what gets embedded in the token payload under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserClaim {
    pub id: i64,
    pub name: String,
    pub admin: bool,
}

impl User {
    pub fn serialized(&self) -> UserClaim {
        UserClaim {
            id: self.id,
            name: self.name.clone(),
            admin: self.admin,
        }
    }
}

/// Movie
///
/// A catalog entry from the `movies` table.
///
/// `genre` is stored as one comma-joined string (e.g. `"Action,Drama"`), so genre
/// searches are substring matches against that string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub director: String,
    pub genre: String,
    pub imdb_score: f64,
    // Exposed as "99popularity" on the wire, matching the dataset the catalog was seeded from.
    #[serde(rename = "99popularity")]
    pub popularity: f64,
}

// --- Request Payloads (Input Schemas) ---

/// MovieRequest
///
/// Body for `POST /movies` and `PUT /movies/{id}`. Updates replace every field.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct MovieRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "director must not be empty"))]
    pub director: String,
    pub genre: Vec<String>,
    #[validate(range(min = 0.0, max = 10.0, message = "imdb_score must be between 0 and 10"))]
    pub imdb_score: f64,
    #[serde(rename = "99popularity")]
    #[validate(range(min = 0.0, max = 100.0, message = "99popularity must be between 0 and 100"))]
    pub popularity: f64,
}

impl MovieRequest {
    /// Trims each genre entry and joins them with commas, the persisted form.
    pub fn joined_genre(&self) -> String {
        self.genre
            .iter()
            .map(|g| g.trim())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// NewMovie
///
/// Normalized insert/update record handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub director: String,
    pub genre: String,
    pub imdb_score: f64,
    pub popularity: f64,
}

impl From<MovieRequest> for NewMovie {
    fn from(req: MovieRequest) -> Self {
        let genre = req.joined_genre();
        Self {
            name: req.name,
            director: req.director,
            genre,
            imdb_score: req.imdb_score,
            popularity: req.popularity,
        }
    }
}

// --- Response Schemas (Output) ---

/// TokenResponse
///
/// Successful login output.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// MovieResponse
///
/// Single-movie envelope used by get, create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MovieResponse {
    pub message: String,
    pub movie: Movie,
}

/// MovieListResponse
///
/// Multi-movie envelope used by the listing and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MovieListResponse {
    pub message: String,
    pub movies: Vec<Movie>,
}
