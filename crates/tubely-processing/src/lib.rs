//! Tubely Processing Library
//!
//! Wrappers around the external media tools used by the upload pipeline:
//! `ffprobe` for stream geometry and `ffmpeg` for fast-start remuxing. Both sit behind
//! traits so callers can substitute deterministic implementations.

pub mod command;
pub mod error;
pub mod probe;
pub mod remux;
pub mod validator;

pub use error::ProcessingError;
pub use probe::{FfprobeProber, MediaProber};
pub use remux::{processed_path, FastStartRemuxer, FfmpegRemuxer};
pub use validator::{normalize_mime_type, validate_video_content_type, ValidationError};

#[cfg(all(test, unix))]
pub(crate) mod test_support;
