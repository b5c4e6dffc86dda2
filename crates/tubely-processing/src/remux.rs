//! Fast-start remuxing via ffmpeg
//!
//! Moves the MP4 index (`moov` atom) to the front of the file so playback can start
//! before the download completes. Streams are copied, never re-encoded.

use crate::command::{run_tool, validate_tool_path};
use crate::error::ProcessingError;
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;
use tubely_core::constants::PROCESSED_SUFFIX;

/// Rewrites a local MP4 for progressive playback.
///
/// The returned [`TempPath`] owns the output file and removes it on drop.
#[async_trait]
pub trait FastStartRemuxer: Send + Sync {
    async fn remux(&self, input: &Path) -> Result<TempPath, ProcessingError>;
}

/// `{input}.processed`
pub fn processed_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(PROCESSED_SUFFIX);
    PathBuf::from(path)
}

pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path("ffmpeg", &ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl FastStartRemuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<TempPath, ProcessingError> {
        let start = std::time::Instant::now();

        // Owned before ffmpeg runs so partial output is removed on every exit path.
        let output_path = TempPath::from_path(processed_path(input));

        let args: [&OsStr; 12] = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-y"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            OsStr::new("-movflags"),
            OsStr::new("faststart"),
            OsStr::new("-f"),
            OsStr::new("mp4"),
            output_path.as_os_str(),
        ];

        if let Err(e) = run_tool("ffmpeg", &self.ffmpeg_path, args, self.timeout).await {
            tracing::error!(
                error = %e,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Fast-start remux failed"
            );
            return Err(e);
        }

        let size_bytes = match tokio::fs::metadata(&output_path).await {
            Ok(metadata) if metadata.len() > 0 => metadata.len(),
            _ => return Err(ProcessingError::EmptyOutput(output_path.to_path_buf())),
        };

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            size_bytes = size_bytes,
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}
