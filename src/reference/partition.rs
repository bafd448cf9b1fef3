//! Grayscale/color split of the patch sequence

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Divides the patch sequence into a grayscale sub-range and a color
/// sub-range.
///
/// With `grayscale_first` the grayscale patches are `[0, split)` and the
/// color patches `[split, n)`; otherwise the order is reversed. A `split` of
/// zero means every patch belongs to the leading kind and is treated exactly
/// like `split == n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Whether the grayscale patches come first
    pub grayscale_first: bool,

    /// Number of patches before the change of kind
    pub split: usize,
}

impl Partition {
    pub fn new(grayscale_first: bool, split: usize) -> Self {
        Self {
            grayscale_first,
            split,
        }
    }

    /// Split count with the zero sentinel resolved against `num_patches`
    pub fn normalized_split(&self, num_patches: usize) -> usize {
        if self.split == 0 {
            num_patches
        } else {
            self.split.min(num_patches)
        }
    }

    /// Patch ordinals of the grayscale-oriented sub-range
    pub fn grayscale_range(&self, num_patches: usize) -> Range<usize> {
        let split = self.normalized_split(num_patches);
        if self.grayscale_first {
            0..split
        } else {
            split..num_patches
        }
    }

    /// Patch ordinals of the color-oriented sub-range
    pub fn color_range(&self, num_patches: usize) -> Range<usize> {
        let split = self.normalized_split(num_patches);
        if self.grayscale_first {
            split..num_patches
        } else {
            0..split
        }
    }
}
