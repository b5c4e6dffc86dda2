//! Tubely Storage Library
//!
//! This crate provides the object storage abstraction used by the upload pipeline.
//! It includes the Storage trait and implementations for S3 and local filesystem.
//!
//! # Storage key format
//!
//! Keys are scoped by aspect class: `{class}/{token}.mp4`, where `token` is 256 random
//! bits encoded as URL-safe base64 without padding. Keys must not contain `..` or a
//! leading `/`. Key generation is centralized in the `keys` module so all backends
//! agree on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_storage_key, random_token};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
