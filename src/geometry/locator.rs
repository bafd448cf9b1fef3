//! Contract with the external patch locator

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::PixelPoint;
use crate::config::{read_json, write_json};
use crate::reference::ReferenceTable;
use crate::{CollaboratorError, MeasureError, Result};

/// Positions produced by the locator for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedTarget {
    /// Patch locations in reference patch order
    pub patch_centers: Vec<PixelPoint>,

    /// Target bounding corners; the first two span the target length
    pub corners: Vec<PixelPoint>,
}

impl LocatedTarget {
    /// Check the locator output against the reference table.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::LocatorFailure`] if fewer patch centers than
    /// reference patches, or fewer than two corners, were produced
    pub fn check_against(&self, reference: &ReferenceTable) -> Result<()> {
        let expected = reference.num_patches();
        if self.patch_centers.len() < expected {
            return Err(MeasureError::LocatorFailure {
                reason: format!(
                    "located {} patches, target has {}",
                    self.patch_centers.len(),
                    expected
                ),
            });
        }
        if self.corners.len() < 2 {
            return Err(MeasureError::LocatorFailure {
                reason: format!("located {} target corners, need 2", self.corners.len()),
            });
        }
        Ok(())
    }

    /// Load a placement saved by an earlier locator run
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Save the placement to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "located target")
    }

    /// The two corners spanning the target length
    pub fn length_corners(&self) -> Option<[PixelPoint; 2]> {
        match self.corners.as_slice() {
            [first, second, ..] => Some([*first, *second]),
            _ => None,
        }
    }
}

/// External collaborator that finds the target and its patches in an image.
///
/// Invoked synchronously once per run. It either returns a complete
/// placement or fails; partial results are not accepted.
pub trait PatchLocator {
    fn locate(&self, reference: &ReferenceTable) -> std::result::Result<LocatedTarget, CollaboratorError>;
}

/// A placement computed ahead of time serves as its own locator.
impl PatchLocator for LocatedTarget {
    fn locate(&self, _reference: &ReferenceTable) -> std::result::Result<LocatedTarget, CollaboratorError> {
        Ok(self.clone())
    }
}
