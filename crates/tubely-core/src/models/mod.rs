//! Domain models

pub mod aspect;
pub mod video;

pub use aspect::{AspectClass, VideoGeometry};
pub use video::{Video, VideoResponse};
