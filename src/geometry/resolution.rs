//! Image resolution from located target corners
//!
//! The distance between the two length corners, in pixels, is compared to
//! the printed target length to give pixels per inch.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::PixelPoint;
use crate::color::rounding::round2;
use crate::constants::units::CM_PER_INCH;
use crate::reference::TargetSize;
use crate::{MeasureError, Result};

/// Located length corners plus the printed size of the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGeometry {
    pub corners: [PixelPoint; 2],
    pub size: TargetSize,
}

/// Derived resolution of the image under test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Corner-to-corner length, rounded to whole pixels
    pub target_length_px: f64,

    /// Pixels per inch, two decimals
    pub ppi: f64,
}

/// Resolution calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionCalculator;

impl ResolutionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the resolution for `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::GeometryDegenerate`] if the corners coincide
    /// or the physical length is not positive
    pub fn compute(&self, geometry: &TargetGeometry) -> Result<Resolution> {
        let [first, second] = geometry.corners;
        if first == second {
            return Err(MeasureError::GeometryDegenerate {
                reason: format!("corners coincide at ({}, {})", first.x, first.y),
            });
        }

        let length_cm = geometry.size.length_cm;
        if length_cm.is_nan() || length_cm <= 0.0 {
            return Err(MeasureError::GeometryDegenerate {
                reason: format!("physical target length is {} cm", length_cm),
            });
        }

        let target_length_px = first.distance_to(second).round();
        let ppi = round2(target_length_px / (length_cm / CM_PER_INCH));

        info!(target_length_px, ppi, "Resolution computed");

        Ok(Resolution {
            target_length_px,
            ppi,
        })
    }
}
