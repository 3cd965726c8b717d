use movie_catalog::{
    AppState, TokenService,
    config::{AppConfig, Env},
    create_router,
    repository::{InMemoryRepository, PostgresRepository, RepositoryState, ensure_admin},
};
use sqlx::postgres::PgPoolOptions;
use std::{process, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, database, token service, HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail fast on a missing secret or database URL)
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // 2. Logging: RUST_LOG wins, otherwise verbose defaults for local work.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "movie_catalog=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Token service. The secret is read here once and never again.
    let tokens = match TokenService::new(&config.secret_key) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            tracing::error!(error = %e, "cannot build token service");
            process::exit(1);
        }
    };

    // 4. Database (only production insists on one)
    let repo = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("FATAL: Failed to apply database migrations.");

            Arc::new(PostgresRepository::new(pool)) as RepositoryState
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store. Data is lost on exit.");
            Arc::new(InMemoryRepository::new()) as RepositoryState
        }
    };

    // 5. First admin account
    if let Some(admin) = &config.bootstrap_admin {
        match ensure_admin(repo.as_ref(), &admin.name, &admin.password).await {
            Ok(user) => tracing::info!(user = %user.name, "bootstrap admin ready"),
            Err(e) => {
                tracing::error!(error = %e, "cannot create bootstrap admin");
                process::exit(1);
            }
        }
    }

    // 6. Unified state and server
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        repo,
        tokens,
        config,
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await.expect("HTTP server error");
}
