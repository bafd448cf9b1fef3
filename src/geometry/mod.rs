//! Target geometry and patch placement
//!
//! Patch centers and target corners come from an external locator. This
//! module defines the data it must supply and derives the physical
//! resolution of the image from it.

pub mod locator;
pub mod resolution;

pub use locator::{LocatedTarget, PatchLocator};
pub use resolution::{Resolution, ResolutionCalculator, TargetGeometry};

use serde::{Deserialize, Serialize};

/// Integer pixel position in the image under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, in pixels
    pub fn distance_to(&self, other: PixelPoint) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}
