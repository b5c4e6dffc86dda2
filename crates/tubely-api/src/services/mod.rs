//! Application services

pub mod ingest;
pub mod staging;

pub use ingest::{IngestService, IngestSettings};
pub use staging::BodyError;
