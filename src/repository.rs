use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use tokio::sync::RwLock;

use crate::{
    auth::password::hash_password,
    error::AppError,
    filter::{Predicate, like_pattern},
    models::{Movie, NewMovie, User},
};

const MOVIE_CONFLICT: &str = "Movie already exist.";
const USER_CONFLICT: &str = "User already exist.";

/// Repository Trait
///
/// Abstract contract for all persistence operations. Handlers only see
/// `Arc<dyn Repository>`, so the Postgres store and the in-memory store are
/// interchangeable.
///
/// Searching goes through a single operation, `query_movies`, which receives the
/// predicate list built by `filter::build_filters` and ANDs it.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, AppError>;
    // Fails with `AppError::Conflict` when the name is already taken.
    async fn create_user(&self, name: &str, password_hash: &str, admin: bool) -> Result<User, AppError>;

    // --- Movie retrieval ---
    // All movies matching every predicate, ordered by id. An empty slice matches everything.
    async fn query_movies(&self, predicates: &[Predicate]) -> Result<Vec<Movie>, AppError>;
    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, AppError>;
    async fn find_movie_by_name(&self, name: &str) -> Result<Option<Movie>, AppError>;

    // --- Movie mutation ---
    // Fails with `AppError::Conflict` when the name is already taken.
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, AppError>;
    // `None` when no movie has that id.
    async fn update_movie(&self, id: i64, movie: NewMovie) -> Result<Option<Movie>, AppError>;
    // Returns the removed row, `None` when no movie has that id.
    async fn delete_movie(&self, id: i64) -> Result<Option<Movie>, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const MOVIE_COLUMNS: &str = "id, name, director, genre, imdb_score, popularity";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL (see `migrations/`).
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// movie_query
///
/// Renders a predicate list as a `SELECT` over `movies`: one `AND` clause per
/// predicate, in list order, then `ORDER BY id`.
pub fn movie_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM movies WHERE TRUE", MOVIE_COLUMNS));

    for predicate in predicates {
        push_predicate(&mut builder, predicate);
    }

    builder.push(" ORDER BY id");
    builder
}

/// Appends one predicate as an `AND` clause. Values are always bound, never interpolated.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::NameContains(needle) => {
            builder.push(" AND name ILIKE ");
            builder.push_bind(like_pattern(needle));
        }
        Predicate::DirectorContains(needle) => {
            builder.push(" AND director ILIKE ");
            builder.push_bind(like_pattern(needle));
        }
        Predicate::GenreContains(needle) => {
            builder.push(" AND genre ILIKE ");
            builder.push_bind(like_pattern(needle));
        }
        Predicate::PopularityAtLeast(bound) => {
            builder.push(" AND popularity >= ");
            builder.push_bind(*bound);
        }
    }
}

fn map_write_error(e: sqlx::Error, conflict: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict(conflict.to_string())
        }
        other => other.into(),
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, password_hash, admin FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, name: &str, password_hash: &str, admin: bool) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, password_hash, admin) VALUES ($1, $2, $3) \
             RETURNING id, name, password_hash, admin",
        )
        .bind(name)
        .bind(password_hash)
        .bind(admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, USER_CONFLICT))
    }

    async fn query_movies(&self, predicates: &[Predicate]) -> Result<Vec<Movie>, AppError> {
        let mut builder = movie_query(predicates);
        let movies = builder
            .build_query_as::<Movie>()
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE id = $1",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn find_movie_by_name(&self, name: &str) -> Result<Option<Movie>, AppError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {} FROM movies WHERE name = $1",
            MOVIE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }

    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>(&format!(
            "INSERT INTO movies (name, director, genre, imdb_score, popularity) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            MOVIE_COLUMNS
        ))
        .bind(movie.name)
        .bind(movie.director)
        .bind(movie.genre)
        .bind(movie.imdb_score)
        .bind(movie.popularity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, MOVIE_CONFLICT))
    }

    async fn update_movie(&self, id: i64, movie: NewMovie) -> Result<Option<Movie>, AppError> {
        sqlx::query_as::<_, Movie>(&format!(
            "UPDATE movies SET name = $2, director = $3, genre = $4, imdb_score = $5, popularity = $6 \
             WHERE id = $1 RETURNING {}",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .bind(movie.name)
        .bind(movie.director)
        .bind(movie.genre)
        .bind(movie.imdb_score)
        .bind(movie.popularity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, MOVIE_CONFLICT))
    }

    async fn delete_movie(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "DELETE FROM movies WHERE id = $1 RETURNING {}",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movie)
    }
}

/// InMemoryRepository
///
/// A `Repository` kept entirely in process memory. Used by the test suites and
/// for running the API without a database. Predicates are evaluated with
/// `Predicate::matches`, which follows the same semantics as the SQL rendering.
#[derive(Default)]
pub struct InMemoryRepository {
    users: RwLock<Vec<User>>,
    movies: RwLock<MovieTable>,
}

#[derive(Default)]
struct MovieTable {
    rows: BTreeMap<i64, Movie>,
    last_id: i64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding of user accounts.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
            movies: RwLock::default(),
        }
    }

    /// Inserts a movie directly, bypassing the duplicate-name check. Returns the stored row.
    pub async fn seed_movie(&self, movie: NewMovie) -> Movie {
        let mut table = self.movies.write().await;
        table.insert(movie)
    }
}

impl MovieTable {
    fn insert(&mut self, movie: NewMovie) -> Movie {
        self.last_id += 1;
        let row = Movie {
            id: self.last_id,
            name: movie.name,
            director: movie.director,
            genre: movie.genre,
            imdb_score: movie.imdb_score,
            popularity: movie.popularity,
        };
        self.rows.insert(row.id, row.clone());
        row
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|m| m.name == name && Some(m.id) != except)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.name == name).cloned())
    }

    async fn create_user(&self, name: &str, password_hash: &str, admin: bool) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.name == name) {
            return Err(AppError::Conflict(USER_CONFLICT.to_string()));
        }

        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            admin,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn query_movies(&self, predicates: &[Predicate]) -> Result<Vec<Movie>, AppError> {
        let table = self.movies.read().await;
        Ok(table
            .rows
            .values()
            .filter(|movie| predicates.iter().all(|p| p.matches(movie)))
            .cloned()
            .collect())
    }

    async fn get_movie(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let table = self.movies.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_movie_by_name(&self, name: &str) -> Result<Option<Movie>, AppError> {
        let table = self.movies.read().await;
        Ok(table.rows.values().find(|m| m.name == name).cloned())
    }

    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, AppError> {
        let mut table = self.movies.write().await;
        if table.name_taken(&movie.name, None) {
            return Err(AppError::Conflict(MOVIE_CONFLICT.to_string()));
        }
        Ok(table.insert(movie))
    }

    async fn update_movie(&self, id: i64, movie: NewMovie) -> Result<Option<Movie>, AppError> {
        let mut table = self.movies.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.name_taken(&movie.name, Some(id)) {
            return Err(AppError::Conflict(MOVIE_CONFLICT.to_string()));
        }

        let row = Movie {
            id,
            name: movie.name,
            director: movie.director,
            genre: movie.genre,
            imdb_score: movie.imdb_score,
            popularity: movie.popularity,
        };
        table.rows.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_movie(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let mut table = self.movies.write().await;
        Ok(table.rows.remove(&id))
    }
}

/// ensure_admin
///
/// Creates the bootstrap admin account unless a user with that name already
/// exists. An existing account is returned untouched, password included.
pub async fn ensure_admin(repo: &dyn Repository, name: &str, password: &str) -> Result<User, AppError> {
    if let Some(existing) = repo.find_user_by_name(name).await? {
        return Ok(existing);
    }

    let password_hash = hash_password(password)?;
    repo.create_user(name, &password_hash, true).await
}
