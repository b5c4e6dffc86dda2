//! Aspect ratio classification

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

const LANDSCAPE_MIN: f64 = 1.76;
const LANDSCAPE_MAX: f64 = 1.78;
const PORTRAIT_MIN: f64 = 0.55;
const PORTRAIT_MAX: f64 = 0.57;

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

impl VideoGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. `None` when the height is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }

    pub fn aspect_class(&self) -> AspectClass {
        self.ratio()
            .map(AspectClass::from_ratio)
            .unwrap_or(AspectClass::Other)
    }
}

/// Orientation bucket used as the storage key prefix.
///
/// The bands are narrow windows around 16:9 and 9:16. Anything outside them is
/// `Other`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Landscape,
    Portrait,
    Other,
}

impl AspectClass {
    pub fn from_ratio(ratio: f64) -> Self {
        if (LANDSCAPE_MIN..=LANDSCAPE_MAX).contains(&ratio) {
            AspectClass::Landscape
        } else if (PORTRAIT_MIN..=PORTRAIT_MAX).contains(&ratio) {
            AspectClass::Portrait
        } else {
            AspectClass::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClass::Landscape => "landscape",
            AspectClass::Portrait => "portrait",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
