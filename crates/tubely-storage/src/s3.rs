use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Bytes buffered before switching to a multipart upload; also the part size.
/// S3 rejects non-final parts under 5 MiB.
const DEFAULT_PART_SIZE: usize = 10 * 1024 * 1024;

type DynObjectStore = dyn object_store::ObjectStore;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<DynObjectStore>,
    bucket: String,
    public_base_url: String,
    part_size: usize,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Base of playback URLs. When `None`, derived from the bucket,
    ///   region and endpoint.
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = public_base_url
            .unwrap_or_else(|| default_public_base_url(&bucket, &region, endpoint_url.as_deref()));

        Ok(Self::with_store(Arc::new(store), bucket, public_base_url))
    }

    /// Wrap an already-built object store. Used for S3-compatible stores built elsewhere
    /// and for tests running against `object_store::memory::InMemory`.
    pub fn with_store(
        store: Arc<DynObjectStore>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let public_base_url: String = public_base_url.into();
        S3Storage {
            store,
            bucket: bucket.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            part_size: DEFAULT_PART_SIZE,
        }
    }

    /// Override the multipart part size.
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }
}

/// Default public base URL for an S3 bucket
///
/// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com
/// For S3-compatible providers, uses path-style addressing: {endpoint}/{bucket}
fn default_public_base_url(bucket: &str, region: &str, endpoint_url: Option<&str>) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        None => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_file(
        &self,
        storage_key: &str,
        source: &std::path::Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        validate_key(storage_key)?;

        let start = std::time::Instant::now();
        let mut file = tokio::fs::File::open(source).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to open {}: {}",
                source.display(),
                e
            ))
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Small files go up as one PUT, larger ones as a multipart upload. Either way
        // the object only becomes visible once the upload completes.
        let mut writer = BufWriter::with_capacity(
            self.store.clone(),
            Path::from(storage_key.to_string()),
            self.part_size,
        )
        .with_attributes(attributes);

        let result = match tokio::io::copy(&mut file, &mut writer).await {
            Ok(size) => writer.shutdown().await.map(|()| size),
            Err(e) => Err(e),
        };

        let size = match result {
            Ok(size) => size,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort S3 upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(size)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.public_base_url, storage_key)
    }
}
