//! Square sample window requested from the pixel extractor

use serde::{Deserialize, Serialize};

use crate::geometry::PixelPoint;

/// Crop requested for one patch.
///
/// The window starts half a stencil past the located patch position, which
/// is what the locator's coordinates are calibrated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWindow {
    /// Patch ordinal the window belongs to
    pub patch: usize,

    /// Top-left corner of the crop
    pub origin: PixelPoint,

    /// Side length in pixels
    pub size: u32,
}

impl SampleWindow {
    /// Window for the patch located at `location` with the given stencil
    pub fn for_patch(patch: usize, location: PixelPoint, stencil: u32) -> Self {
        let offset = i64::from(stencil / 2);
        Self {
            patch,
            origin: PixelPoint::new(location.x + offset, location.y + offset),
            size: stencil,
        }
    }

    /// Number of pixels the window covers
    pub fn area(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    /// Geometry string in `WxH+X+Y` form for crop tools
    pub fn crop_geometry(&self) -> String {
        format!(
            "{}x{}+{}+{}",
            self.size, self.size, self.origin.x, self.origin.y
        )
    }
}
