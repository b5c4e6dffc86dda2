//! Service wiring

use crate::auth::JwtAuthenticator;
use crate::services::{IngestService, IngestSettings};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{FfmpegRemuxer, FfprobeProber};
use tubely_storage::Storage;

/// Build the ffmpeg-backed ingest pipeline and the shared state around it.
pub fn initialize_services(
    config: &Config,
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let ingest_config = &config.ingest;

    let prober = FfprobeProber::new(ingest_config.ffprobe_path.clone(), ingest_config.probe_timeout)
        .context("Invalid FFPROBE_PATH")?;
    let remuxer =
        FfmpegRemuxer::new(ingest_config.ffmpeg_path.clone(), ingest_config.remux_timeout)
            .context("Invalid FFMPEG_PATH")?;

    std::fs::create_dir_all(&ingest_config.temp_dir).with_context(|| {
        format!(
            "Failed to create temp directory {}",
            ingest_config.temp_dir.display()
        )
    })?;

    let ingest = IngestService::new(
        videos,
        storage,
        Arc::new(prober),
        Arc::new(remuxer),
        IngestSettings {
            max_upload_bytes: ingest_config.max_upload_bytes,
            temp_dir: ingest_config.temp_dir.clone(),
        },
    );

    tracing::info!(
        ffprobe_path = %ingest_config.ffprobe_path,
        ffmpeg_path = %ingest_config.ffmpeg_path,
        temp_dir = %ingest_config.temp_dir.display(),
        "Ingest pipeline initialized"
    );

    Ok(Arc::new(AppState {
        config: Arc::new(config.clone()),
        authenticator: Arc::new(JwtAuthenticator::new(config.jwt_secret())),
        ingest,
    }))
}
