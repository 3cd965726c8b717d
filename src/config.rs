use std::env;

use thiserror::Error;

/// ConfigError
///
/// Startup-time configuration failures. These are fatal: the binary refuses to
/// boot rather than run with a missing signing secret or database.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only with every request through `FromRef`.
#[derive(Clone)]
pub struct AppConfig {
    // Database connection string (Postgres). `None` runs on the in-memory store (local only).
    pub db_url: Option<String>,
    // Symmetric HMAC key for access tokens. Rotating it invalidates every issued token.
    pub secret_key: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls the log output format and whether a database is required.
    pub env: Env,
    // Admin account created at startup when it does not exist yet.
    pub bootstrap_admin: Option<AdminCredentials>,
}

/// AdminCredentials
///
/// Read from `ADMIN_NAME` / `ADMIN_PASSWORD`. Users are not registered through
/// the API, so this is how a fresh deployment gets its first admin.
#[derive(Clone, Debug, PartialEq)]
pub struct AdminCredentials {
    pub name: String,
    pub password: String,
}

/// Env
///
/// Runtime context: local development or production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for test state scaffolding.
    fn default() -> Self {
        Self {
            db_url: None,
            secret_key: "super-secure-test-secret-value-local".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            env: Env::Local,
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (call `dotenv` first).
    ///
    /// `SECRET_KEY` is mandatory in every environment; there is no fallback signing
    /// secret. `DATABASE_URL` is mandatory in production only. `ADMIN_PASSWORD` is
    /// mandatory once `ADMIN_NAME` is set.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let secret_key = env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        if secret_key.is_empty() {
            return Err(ConfigError::Empty("SECRET_KEY"));
        }

        let db_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if db_url.is_none() && env == Env::Production {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let bootstrap_admin = match env::var("ADMIN_NAME").ok().filter(|n| !n.is_empty()) {
            Some(name) => {
                let password =
                    env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::Missing("ADMIN_PASSWORD"))?;
                if password.is_empty() {
                    return Err(ConfigError::Empty("ADMIN_PASSWORD"));
                }
                Some(AdminCredentials { name, password })
            }
            None => None,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            db_url,
            secret_key,
            bind_addr,
            env,
            bootstrap_admin,
        })
    }
}
