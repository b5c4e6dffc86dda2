//! Staging of upload bodies to local temporary files

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::{ACCEPTED_VIDEO_EXTENSION, STAGED_UPLOAD_PREFIX};
use tubely_core::AppError;

use super::ingest::IngestSettings;

/// Failure while reading the request body
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds the configured limit")]
    TooLarge,

    #[error("failed to read upload: {0}")]
    Aborted(String),
}

impl From<MultipartError> for BodyError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            BodyError::TooLarge
        } else {
            BodyError::Aborted(err.body_text())
        }
    }
}

impl From<BodyError> for AppError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::TooLarge => AppError::PayloadTooLarge(err.to_string()),
            BodyError::Aborted(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

fn too_large(max_upload_bytes: u64) -> AppError {
    AppError::PayloadTooLarge(format!(
        "Video exceeds the maximum upload size of {} bytes",
        max_upload_bytes
    ))
}

/// Copy `body` into a fresh temp file under `settings.temp_dir`.
///
/// The byte count is checked before each chunk is written, so an oversized upload is
/// rejected without ever exceeding the ceiling on disk. The returned file is removed
/// when dropped; on error it has already been removed.
pub async fn stage_upload<S>(body: S, settings: &IngestSettings) -> Result<NamedTempFile, AppError>
where
    S: Stream<Item = Result<Bytes, BodyError>> + Send,
{
    let staged = tempfile::Builder::new()
        .prefix(STAGED_UPLOAD_PREFIX)
        .suffix(&format!(".{}", ACCEPTED_VIDEO_EXTENSION))
        .tempfile_in(&settings.temp_dir)
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create staging file in {}: {}",
                settings.temp_dir.display(),
                e
            ))
        })?;

    let mut file = tokio::fs::File::from_std(staged.reopen()?);
    let mut body = std::pin::pin!(body);
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        written += chunk.len() as u64;
        if written > settings.max_upload_bytes {
            return Err(too_large(settings.max_upload_bytes));
        }
        file.write_all(&chunk).await?;
    }

    if written == 0 {
        return Err(AppError::BadRequest("Uploaded video is empty".to_string()));
    }

    file.flush().await?;
    file.sync_all().await?;

    tracing::debug!(
        path = %staged.path().display(),
        size_bytes = written,
        "Upload staged"
    );

    Ok(staged)
}
