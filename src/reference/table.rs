//! Reference color table for a calibration target

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Partition, RampAnchors};
use crate::config::{read_json, write_json};
use crate::{ColorSpace, MeasureError, Result};

/// Lab color representation for reference files.
///
/// Uses CIE L*a*b* coordinates: L in [0, 100], a/b signed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl LabColor {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }
}

/// Device RGB reference value, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }
}

/// Known color of one patch. Either channel set may be missing when the
/// target is only ever measured in the other color space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<LabColor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<RgbColor>,
}

impl ReferencePatch {
    /// Reference triplet in the units of `color_space`, if present
    pub fn values(&self, color_space: ColorSpace) -> Option<[f64; 3]> {
        match color_space {
            ColorSpace::Lab => self.lab.map(LabColor::to_array),
            ColorSpace::Rgb => self.rgb.map(RgbColor::to_array),
        }
    }
}

/// Physical size of the target, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSize {
    /// Length along the corner-0 to corner-1 edge
    pub length_cm: f64,
    pub width_cm: f64,
}

/// Complete reference description of a calibration target.
///
/// Patches are identified by their position in `patches` (0-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    /// Target name, carried into reports
    pub name: String,

    /// Reference colors in patch order
    pub patches: Vec<ReferencePatch>,

    /// Grayscale/color split
    pub partition: Partition,

    /// Tonal-ramp anchors for gain modulation
    #[serde(default)]
    pub ramp: RampAnchors,

    /// Physical target size
    pub size: TargetSize,
}

impl ReferenceTable {
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Check structural invariants that hold regardless of color space.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidReference`] if:
    /// - The table has no patches
    /// - The split count exceeds the number of patches
    /// - A ramp anchor points past the last patch
    pub fn validate(&self) -> Result<()> {
        let n = self.num_patches();
        if n == 0 {
            return Err(MeasureError::invalid_reference("target has no patches"));
        }

        if self.partition.split > n {
            return Err(MeasureError::invalid_reference(format!(
                "split count {} exceeds {} patches",
                self.partition.split, n
            )));
        }

        if let Some((step, ordinal)) = self.ramp.iter().find(|(_, ordinal)| *ordinal >= n) {
            return Err(MeasureError::invalid_reference(format!(
                "ramp anchor {} refers to patch {} of {}",
                step,
                ordinal + 1,
                n
            )));
        }

        Ok(())
    }

    /// Check that every patch carries the channel set `color_space` needs
    pub fn validate_for(&self, color_space: ColorSpace) -> Result<()> {
        self.validate()?;
        match self
            .patches
            .iter()
            .position(|patch| patch.values(color_space).is_none())
        {
            Some(index) => Err(MeasureError::invalid_reference(format!(
                "patch {} has no {} reference value",
                index + 1,
                color_space
            ))),
            None => Ok(()),
        }
    }

    /// Reference triplets for `color_space`, in patch order.
    ///
    /// Call [`ReferenceTable::validate_for`] first; missing values read as zero.
    pub fn values(&self, color_space: ColorSpace) -> Vec<[f64; 3]> {
        self.patches
            .iter()
            .map(|patch| patch.values(color_space).unwrap_or([0.0; 3]))
            .collect()
    }

    /// Load a reference table from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Save the reference table to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "reference table")
    }
}
