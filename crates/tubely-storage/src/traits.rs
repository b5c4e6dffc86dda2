//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait, which lets the
/// ingestion pipeline upload processed videos without knowing where they end up.
///
/// **Key format:** `{class}/{token}.mp4`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload the contents of a local file under `storage_key`.
    ///
    /// The object becomes visible in a single step: readers either see the complete
    /// object or nothing. Returns the number of bytes written.
    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64>;

    /// Public playback URL for an object: `{base}/{storage_key}`
    fn public_url(&self, storage_key: &str) -> String;
}

/// Reject keys that could escape the key space of a backend.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key '{}' contains invalid characters",
            storage_key
        )));
    }
    Ok(())
}
