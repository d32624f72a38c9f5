mod config;
mod db;
mod error;
mod handlers;
mod models;
mod openai;
mod router;
mod storage;
mod tutor;

#[cfg(test)]
mod testing;

use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, Result};

use openai::{OpenAiClient, TutorAi};
use storage::{ImageStore, S3ImageStore};

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
    pub images: Arc<dyn ImageStore>,
    pub ai: Arc<dyn TutorAi>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Initialize database
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // Run migrations
    db::run_migrations(&db).await?;

    let state = Arc::new(AppState {
        db,
        images: Arc::new(S3ImageStore::from_config(&config)),
        ai: Arc::new(OpenAiClient::from_config(&config)),
        config: config.clone(),
    });

    let app = router::build_router(state)?;

    let addr = config.listen_addr();
    tracing::info!("Chinese Tutor Backend running on {}", addr);
    tracing::info!("Frontend URL: {}", config.frontend_url);
    tracing::info!("Environment: {}", config.app_env);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
