//! Contract with the external pixel extractor

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{parse_pixel_dump, RawPixel, SampleWindow};
use crate::config::{read_json, write_json};
use crate::{CollaboratorError, Result};

/// External collaborator that crops a window from the image under test and
/// returns its raw per-pixel channel codes.
///
/// Called once per patch, synchronously. A failure for any patch aborts the
/// run.
pub trait PixelSource {
    fn window_samples(
        &self,
        window: &SampleWindow,
    ) -> std::result::Result<Vec<RawPixel>, CollaboratorError>;
}

/// Pixel samples captured ahead of time, keyed by patch ordinal.
///
/// Lets a run be replayed without the image or the extractor, e.g. from a
/// JSON file written during an earlier session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedPixels {
    patches: BTreeMap<usize, Vec<RawPixel>>,
}

impl RecordedPixels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the samples for `patch`
    pub fn insert(&mut self, patch: usize, samples: Vec<RawPixel>) {
        self.patches.insert(patch, samples);
    }

    /// Store the samples for `patch` from an extractor text dump
    pub fn insert_dump(&mut self, patch: usize, dump: &str) {
        self.insert(patch, parse_pixel_dump(dump));
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Load recorded samples from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Save recorded samples to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "recorded pixels")
    }
}

impl PixelSource for RecordedPixels {
    fn window_samples(
        &self,
        window: &SampleWindow,
    ) -> std::result::Result<Vec<RawPixel>, CollaboratorError> {
        self.patches
            .get(&window.patch)
            .cloned()
            .ok_or_else(|| CollaboratorError::new(format!("no samples recorded for patch {}", window.patch)))
    }
}
