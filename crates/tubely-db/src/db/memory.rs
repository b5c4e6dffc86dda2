use crate::db::video::VideoRepository;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Process-local video store used when no database is configured
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub async fn insert(&self, video: Video) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let existing = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        existing.set_video_url(url.to_string(), updated_at);
        Ok(existing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> Video {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Boots".to_string(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_and_set_video_url() {
        let repo = InMemoryVideoRepository::new();
        let v = video();
        repo.insert(v.clone()).await;

        assert_eq!(repo.get(v.id).await.unwrap().unwrap().video_url, None);

        let later = v.updated_at + chrono::Duration::seconds(3);
        let updated = repo
            .set_video_url(v.id, "https://cdn/landscape/x.mp4", later)
            .await
            .unwrap();
        assert_eq!(updated.video_url.as_deref(), Some("https://cdn/landscape/x.mp4"));
        assert_eq!(updated.updated_at, later);

        let stored = repo.get(v.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_set_video_url_keeps_other_fields() {
        let repo = InMemoryVideoRepository::new();
        let v = video();
        repo.insert(v.clone()).await;

        // Another writer edits the record after it was first read
        let mut edited = v.clone();
        edited.title = "Renamed".to_string();
        edited.thumbnail_url = Some("https://cdn/thumb.png".to_string());
        repo.insert(edited).await;

        let updated = repo
            .set_video_url(v.id, "https://cdn/portrait/y.mp4", Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.thumbnail_url.as_deref(), Some("https://cdn/thumb.png"));
        assert_eq!(updated.video_url.as_deref(), Some("https://cdn/portrait/y.mp4"));
        assert_eq!(updated.created_at, v.created_at);
    }

    #[tokio::test]
    async fn test_missing_records() {
        let repo = InMemoryVideoRepository::new();
        let v = video();
        assert!(repo.get(v.id).await.unwrap().is_none());
        assert!(matches!(
            repo.set_video_url(v.id, "https://cdn/other/z.mp4", Utc::now()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
