//! Tubely Database Library
//!
//! Persistence for video records: a Postgres repository, an in-memory one for
//! development and tests, and the migration runner.

pub mod db;

pub use db::{run_migrations, InMemoryVideoRepository, PgVideoRepository, VideoRepository};
