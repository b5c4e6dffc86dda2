use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Trait for video record persistence
/// This abstracts the database implementation (PostgreSQL or in-memory)
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id. `Ok(None)` when no such record exists.
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Point an existing video at a new playback URL and return the stored record.
    ///
    /// Only `video_url` and `updated_at` are written; every other column keeps
    /// whatever value it has at the time of the write.
    async fn set_video_url(
        &self,
        id: Uuid,
        url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Video, AppError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "videos",
        db.operation = "select",
        db.record_id = %id
    ))]
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, url), fields(
        db.system = "postgresql",
        db.table = "videos",
        db.operation = "update",
        db.record_id = %id
    ))]
    async fn set_video_url(
        &self,
        id: Uuid,
        url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(url)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, video_id = %id, "Failed to update video URL");
            AppError::from(e)
        })?;

        video.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}
