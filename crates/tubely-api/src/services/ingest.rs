//! Video ingestion pipeline
//!
//! A request that passes authorization is staged to disk, probed for its geometry,
//! remuxed for fast start, then uploaded under an aspect-prefixed random key. The
//! record only changes after the object is stored.

use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tubely_core::constants::ACCEPTED_VIDEO_CONTENT_TYPE;
use tubely_core::{AppError, Video};
use tubely_db::VideoRepository;
use tubely_processing::{validate_video_content_type, FastStartRemuxer, MediaProber};
use tubely_storage::{generate_storage_key, Storage};
use uuid::Uuid;

use super::staging::{stage_upload, BodyError};
use crate::error::{storage_error_to_app_error, validation_error_to_app_error};

#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Largest upload accepted, in bytes
    pub max_upload_bytes: u64,
    /// Directory for staged and remuxed temp files
    pub temp_dir: PathBuf,
}

#[derive(Clone)]
pub struct IngestService {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    prober: Arc<dyn MediaProber>,
    remuxer: Arc<dyn FastStartRemuxer>,
    settings: IngestSettings,
}

impl IngestService {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        prober: Arc<dyn MediaProber>,
        remuxer: Arc<dyn FastStartRemuxer>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            videos,
            storage,
            prober,
            remuxer,
            settings,
        }
    }

    /// Load the video and check that `user_id` owns it.
    ///
    /// Runs before any of the request body is read.
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Run the pipeline for an authorized `video` and return the record as stored
    /// after its playback URL was set.
    ///
    /// Temp files are removed on every exit path. If the final record update fails the
    /// stored object is left in place and its key is logged.
    #[tracing::instrument(
        skip(self, video, content_type, body),
        fields(video_id = %video.id, content_type = content_type.unwrap_or(""))
    )]
    pub async fn ingest<S>(
        &self,
        video: Video,
        content_type: Option<&str>,
        body: S,
    ) -> Result<Video, AppError>
    where
        S: Stream<Item = Result<Bytes, BodyError>> + Send,
    {
        let start = Instant::now();

        validate_video_content_type(content_type).map_err(validation_error_to_app_error)?;

        let staged = stage_upload(body, &self.settings).await?;

        let geometry = self
            .prober
            .probe(staged.path())
            .await
            .map_err(|e| AppError::ProbeFailed(e.to_string()))?;

        let processed = self
            .remuxer
            .remux(staged.path())
            .await
            .map_err(|e| AppError::RemuxFailed(e.to_string()))?;

        let aspect = geometry.aspect_class();
        let storage_key = generate_storage_key(aspect);

        let size_bytes = self
            .storage
            .upload_file(&storage_key, &processed, ACCEPTED_VIDEO_CONTENT_TYPE)
            .await
            .map_err(storage_error_to_app_error)?;

        let video_url = self.storage.public_url(&storage_key);

        // Only the URL and timestamp are written, so edits made to the record while
        // the upload was processing survive.
        let updated = match self
            .videos
            .set_video_url(video.id, &video_url, Utc::now())
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(
                    storage_key = %storage_key,
                    error = %e,
                    "Record update failed after upload; stored object is orphaned"
                );
                return Err(match e {
                    AppError::PersistenceFailed(_) => e,
                    other => AppError::PersistenceFailed(other.to_string()),
                });
            }
        };

        tracing::info!(
            storage_key = %storage_key,
            aspect = %aspect,
            width = geometry.width,
            height = geometry.height,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(updated)
    }
}
