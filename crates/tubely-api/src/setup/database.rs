//! Database setup and initialization

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::{run_migrations, InMemoryVideoRepository, PgVideoRepository, VideoRepository};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect to Postgres and apply migrations, or fall back to an in-memory store when
/// `DATABASE_URL` is unset.
pub async fn setup_video_repository(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, video records are kept in memory");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = MAX_CONNECTIONS,
        "Database connected successfully"
    );

    run_migrations(&pool).await?;

    Ok(Arc::new(PgVideoRepository::new(pool)))
}
