//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubely-api`. No database or ffmpeg is
//! needed; the pipeline's collaborators are replaced by the fakes in [`fakes`].

#![allow(dead_code)]

pub mod auth;
pub mod fakes;
pub mod fixtures;

use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::auth::JwtAuthenticator;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_api::{IngestService, IngestSettings};
use tubely_core::{BaseConfig, Config, IngestConfig, StorageBackend, StorageConfig};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{FastStartRemuxer, MediaProber};
use tubely_storage::Storage;

use fakes::{FakeProber, FakeRemuxer, RecordingStorage};

pub const TEST_PLAYBACK_BASE_URL: &str = "https://cdn.tubely.test";
pub const TEST_MAX_UPLOAD_BYTES: u64 = 64 * 1024;

/// Test application: server, collaborators, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub prober: Arc<FakeProber>,
    pub remuxer: Arc<FakeRemuxer>,
    pub storage: Arc<RecordingStorage>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of everything left in the staging directory.
    pub fn staged_files(&self) -> Vec<String> {
        list_dir(self.staging_dir.path())
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("read staging dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect()
}

/// Swappable pieces of the test app; anything left `None` gets a working default.
pub struct TestAppBuilder {
    prober: FakeProber,
    remuxer: FakeRemuxer,
    storage: RecordingStorage,
    backend: Option<Arc<dyn Storage>>,
    repository: Option<Arc<dyn VideoRepository>>,
    max_upload_bytes: u64,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            prober: FakeProber::new(1920, 1080),
            remuxer: FakeRemuxer::new(),
            storage: RecordingStorage::new(TEST_PLAYBACK_BASE_URL),
            backend: None,
            repository: None,
            max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        }
    }
}

impl TestAppBuilder {
    pub fn prober(mut self, prober: FakeProber) -> Self {
        self.prober = prober;
        self
    }

    pub fn remuxer(mut self, remuxer: FakeRemuxer) -> Self {
        self.remuxer = remuxer;
        self
    }

    pub fn storage(mut self, storage: RecordingStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Use a real backend instead of the recording one.
    pub fn backend(mut self, backend: Arc<dyn Storage>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn VideoRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Build the app around `videos`, which backs the default repository.
    pub fn build(self, videos: InMemoryVideoRepository) -> TestApp {
        let staging_dir = tempfile::tempdir().expect("create staging dir");
        let prober = Arc::new(self.prober);
        let remuxer = Arc::new(self.remuxer);
        let storage = Arc::new(self.storage);
        let backend = self
            .backend
            .unwrap_or_else(|| storage.clone() as Arc<dyn Storage>);
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(videos.clone()));

        let config = test_config(staging_dir.path(), self.max_upload_bytes);
        let ingest = IngestService::new(
            repository,
            backend,
            prober.clone() as Arc<dyn MediaProber>,
            remuxer.clone() as Arc<dyn FastStartRemuxer>,
            IngestSettings {
                max_upload_bytes: self.max_upload_bytes,
                temp_dir: staging_dir.path().to_path_buf(),
            },
        );

        let state = Arc::new(AppState {
            config: Arc::new(config),
            authenticator: Arc::new(JwtAuthenticator::new(auth::TEST_JWT_SECRET)),
            ingest,
        });

        let app = routes::setup_routes(state);
        let server =
            TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            videos,
            prober,
            remuxer,
            storage,
            staging_dir,
        }
    }
}

/// Setup a test app with working fakes and an empty in-memory repository.
pub fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build(InMemoryVideoRepository::new())
}

pub fn test_config(temp_dir: &Path, max_upload_bytes: u64) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            log_format: "compact".to_string(),
        },
        database_url: None,
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            cdn_base_url: Some(TEST_PLAYBACK_BASE_URL.to_string()),
            local_storage_path: None,
            local_storage_base_url: None,
        },
        ingest: IngestConfig {
            max_upload_bytes,
            temp_dir: temp_dir.to_path_buf(),
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            probe_timeout: Duration::from_secs(5),
            remux_timeout: Duration::from_secs(5),
        },
    }
}
