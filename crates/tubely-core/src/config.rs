//! Configuration module
//!
//! Configuration is read from the environment (and an optional `.env` file) exactly once
//! at startup. The resulting [`Config`] is immutable and handed to the services that need
//! it; pipeline code never reads the environment itself.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8091;
const MAX_UPLOAD_SIZE_MB: u64 = 1024;
const PROBE_TIMEOUT_SECS: u64 = 30;
const REMUX_TIMEOUT_SECS: u64 = 600;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub log_format: String,
}

/// Object storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub cdn_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

/// Settings for the ingestion pipeline
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub max_upload_bytes: u64,
    pub temp_dir: PathBuf,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub probe_timeout: Duration,
    pub remux_timeout: Duration,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database_url: Option<String>,
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        };

        let backend = match non_empty_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_region: non_empty_var("S3_REGION").or_else(|| non_empty_var("AWS_REGION")),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            cdn_base_url: non_empty_var("CDN_BASE_URL"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
        };

        let max_upload_size_mb = parse_setting(
            "MAX_UPLOAD_SIZE_MB",
            env::var("MAX_UPLOAD_SIZE_MB").ok(),
            MAX_UPLOAD_SIZE_MB,
        )?;

        let ingest = IngestConfig {
            max_upload_bytes: megabytes_to_bytes(max_upload_size_mb)?,
            temp_dir: non_empty_var("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            probe_timeout: Duration::from_secs(parse_setting(
                "PROBE_TIMEOUT_SECS",
                env::var("PROBE_TIMEOUT_SECS").ok(),
                PROBE_TIMEOUT_SECS,
            )?),
            remux_timeout: Duration::from_secs(parse_setting(
                "REMUX_TIMEOUT_SECS",
                env::var("REMUX_TIMEOUT_SECS").ok(),
                REMUX_TIMEOUT_SECS,
            )?),
        };

        Ok(Config {
            base,
            database_url: non_empty_var("DATABASE_URL"),
            storage,
            ingest,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if let Some(ref url) = self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 backend"));
                }
                if self.storage.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none()
                    || self.storage.local_storage_base_url.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    ));
                }
            }
        }

        if self.ingest.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.ingest.probe_timeout.is_zero() || self.ingest.remux_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "PROBE_TIMEOUT_SECS and REMUX_TIMEOUT_SECS must be greater than 0"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.ingest.max_upload_bytes
    }

    /// Base URL that storage keys are appended to when building playback URLs.
    ///
    /// A configured CDN wins. Otherwise the URL is derived from the storage backend:
    /// `https://{bucket}.s3.{region}.amazonaws.com` for AWS, `{endpoint}/{bucket}` for
    /// S3-compatible endpoints, and the local base URL for the local backend.
    pub fn playback_base_url(&self) -> Option<String> {
        if let Some(ref cdn) = self.storage.cdn_base_url {
            return Some(cdn.trim_end_matches('/').to_string());
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                let bucket = self.storage.s3_bucket.as_deref()?;
                match self.storage.s3_endpoint {
                    Some(ref endpoint) => {
                        Some(format!("{}/{}", endpoint.trim_end_matches('/'), bucket))
                    }
                    None => {
                        let region = self.storage.s3_region.as_deref()?;
                        Some(format!("https://{}.s3.{}.amazonaws.com", bucket, region))
                    }
                }
            }
            StorageBackend::Local => self
                .storage
                .local_storage_base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

/// Parse a numeric setting, falling back to `default` only when it is unset.
fn parse_setting(name: &str, value: Option<String>, default: u64) -> Result<u64, anyhow::Error> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
    }
}

fn megabytes_to_bytes(mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", mb))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(backend: StorageBackend) -> Config {
        Config {
            base: BaseConfig {
                server_port: 8091,
                environment: "development".to_string(),
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                log_format: "compact".to_string(),
            },
            database_url: None,
            storage: StorageConfig {
                backend,
                s3_bucket: Some("tubely-videos".to_string()),
                s3_region: Some("us-east-2".to_string()),
                s3_endpoint: None,
                cdn_base_url: None,
                local_storage_path: Some("/var/lib/tubely".to_string()),
                local_storage_base_url: Some("http://localhost:8091/assets/".to_string()),
            },
            ingest: IngestConfig {
                max_upload_bytes: 1 << 30,
                temp_dir: env::temp_dir(),
                ffprobe_path: "ffprobe".to_string(),
                ffmpeg_path: "ffmpeg".to_string(),
                probe_timeout: Duration::from_secs(30),
                remux_timeout: Duration::from_secs(600),
            },
        }
    }

    #[test]
    fn test_playback_base_url_for_aws() {
        let config = test_config(StorageBackend::S3);
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("https://tubely-videos.s3.us-east-2.amazonaws.com")
        );
    }

    #[test]
    fn test_playback_base_url_prefers_cdn() {
        let mut config = test_config(StorageBackend::S3);
        config.storage.cdn_base_url = Some("https://d111111abcdef8.cloudfront.net/".to_string());
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("https://d111111abcdef8.cloudfront.net")
        );
    }

    #[test]
    fn test_playback_base_url_for_custom_endpoint_and_local() {
        let mut config = test_config(StorageBackend::S3);
        config.storage.s3_endpoint = Some("http://localhost:9000/".to_string());
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("http://localhost:9000/tubely-videos")
        );

        let config = test_config(StorageBackend::Local);
        assert_eq!(
            config.playback_base_url().as_deref(),
            Some("http://localhost:8091/assets")
        );
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = test_config(StorageBackend::S3);
        assert!(config.validate().is_ok());
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_bucket_for_s3() {
        let mut config = test_config(StorageBackend::S3);
        config.storage.s3_bucket = None;
        assert!(config.validate().is_err());
        assert!(config.playback_base_url().is_none());
    }

    #[test]
    fn test_validate_rejects_non_postgres_database_url() {
        let mut config = test_config(StorageBackend::Local);
        config.database_url = Some("sqlite://tubely.db".to_string());
        assert!(config.validate().is_err());
        config.database_url = Some("postgres://tubely@localhost/tubely".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_setting_rejects_garbage() {
        assert_eq!(parse_setting("PROBE_TIMEOUT_SECS", None, 30).unwrap(), 30);
        assert_eq!(
            parse_setting("PROBE_TIMEOUT_SECS", Some(" 45 ".to_string()), 30).unwrap(),
            45
        );

        let err = parse_setting("REMUX_TIMEOUT_SECS", Some("10m".to_string()), 600).unwrap_err();
        assert!(err.to_string().contains("REMUX_TIMEOUT_SECS"));
        assert!(parse_setting("PROBE_TIMEOUT_SECS", Some("-5".to_string()), 30).is_err());
    }

    #[test]
    fn test_megabytes_to_bytes_overflow() {
        assert_eq!(megabytes_to_bytes(1024).unwrap(), 1 << 30);
        assert!(megabytes_to_bytes(u64::MAX / 1024).is_err());
    }
}
