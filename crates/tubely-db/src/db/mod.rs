//! Database repositories for data access layer
//!
//! `VideoRepository` is the seam used by the API; `PgVideoRepository` backs it with
//! PostgreSQL and `InMemoryVideoRepository` serves development setups without a database
//! and tests.

pub mod memory;
pub mod migrate;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use migrate::run_migrations;
pub use video::{PgVideoRepository, VideoRepository};
