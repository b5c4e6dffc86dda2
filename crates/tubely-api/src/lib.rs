//! Tubely API Library
//!
//! HTTP handlers, the video ingest pipeline, and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{IngestService, IngestSettings};
pub use state::AppState;
