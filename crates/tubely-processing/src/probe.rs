//! Media probing via ffprobe

use crate::command::{run_tool, validate_tool_path};
use crate::error::ProcessingError;
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tubely_core::VideoGeometry;

/// Reads the geometry of the first video stream of a local file.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProcessingError>;
}

const PROBE_ARGS: [&str; 7] = [
    "-v",
    "error",
    "-print_format",
    "json",
    "-show_streams",
    "-select_streams",
    "v:0",
];

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Extract the geometry of the first stream from ffprobe's JSON output
fn parse_geometry(stdout: &[u8]) -> Result<VideoGeometry, ProcessingError> {
    let output: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::InvalidOutput(format!("ffprobe JSON: {}", e)))?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or(ProcessingError::NoVideoStream)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(VideoGeometry::new(width, height))
        }
        _ => Err(ProcessingError::InvalidOutput(
            "video stream has no dimensions".to_string(),
        )),
    }
}

pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path("ffprobe", &ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoGeometry, ProcessingError> {
        let start = std::time::Instant::now();

        let output = run_tool(
            "ffprobe",
            &self.ffprobe_path,
            PROBE_ARGS
                .into_iter()
                .map(OsStr::new)
                .chain(std::iter::once(path.as_os_str())),
            self.timeout,
        )
        .await?;

        let geometry = parse_geometry(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}
