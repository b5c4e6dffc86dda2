//! In-process stand-ins for the external collaborators of the ingest pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempPath;
use tubely_core::{AppError, Video, VideoGeometry};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{processed_path, FastStartRemuxer, MediaProber, ProcessingError};
use tubely_storage::{Storage, StorageError, StorageResult};
use uuid::Uuid;

pub const PROCESSED_MARKER: &[u8] = b"+faststart";

/// Reports a fixed geometry, or fails when constructed with [`FakeProber::failing`].
pub struct FakeProber {
    geometry: Option<VideoGeometry>,
    edit_during_probe: Option<(InMemoryVideoRepository, Video)>,
    calls: AtomicUsize,
}

impl FakeProber {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(VideoGeometry::new(width, height)),
            edit_during_probe: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            geometry: None,
            ..Self::new(0, 0)
        }
    }

    /// Replace the stored record with `edited` while the probe runs, standing in
    /// for another request that changes the video mid-upload.
    pub fn editing(mut self, videos: InMemoryVideoRepository, edited: Video) -> Self {
        self.edit_during_probe = Some((videos, edited));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "probe called without a staged file");
        if let Some((videos, edited)) = &self.edit_during_probe {
            videos.insert(edited.clone()).await;
        }
        self.geometry.ok_or(ProcessingError::NoVideoStream)
    }
}

/// Copies the input next to itself with [`PROCESSED_MARKER`] appended.
pub struct FakeRemuxer {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeRemuxer {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FastStartRemuxer for FakeRemuxer {
    async fn remux(&self, input: &Path) -> Result<TempPath, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            });
        }

        let output = processed_path(input);
        let mut data =
            std::fs::read(input).map_err(|e| ProcessingError::InvalidOutput(e.to_string()))?;
        data.extend_from_slice(PROCESSED_MARKER);
        std::fs::write(&output, data)
            .map_err(|e| ProcessingError::InvalidOutput(e.to_string()))?;
        Ok(TempPath::from_path(output))
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Keeps uploaded objects in memory.
pub struct RecordingStorage {
    base_url: String,
    fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl RecordingStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            fail: false,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(base_url: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(base_url)
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        if self.fail {
            return Err(StorageError::BackendError("connection reset".to_string()));
        }
        let data = std::fs::read(source)?;
        let size = data.len() as u64;
        self.objects.lock().unwrap().push(StoredObject {
            key: storage_key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(size)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }
}

/// Reads succeed; every update fails as if the database went away mid-request.
pub struct UpdateFailingRepository {
    inner: InMemoryVideoRepository,
}

impl UpdateFailingRepository {
    pub fn new(inner: InMemoryVideoRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VideoRepository for UpdateFailingRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get(id).await
    }

    async fn set_video_url(
        &self,
        _id: Uuid,
        _url: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<Video, AppError> {
        Err(AppError::PersistenceFailed("pool timed out".to_string()))
    }
}
