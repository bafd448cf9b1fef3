//! Per-channel RGB deviation for device-RGB runs

use serde::{Deserialize, Serialize};

use super::rounding::{round2, round_to};

/// Absolute per-channel deviation between reference and measured RGB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RgbMetrics {
    /// Deviation per patch and channel, whole code values
    pub deviation: Vec<[u32; 3]>,

    /// Mean over every channel of every patch, two decimals
    pub mean: f64,

    /// Largest single-channel deviation over all patches
    pub max: u32,
}

impl RgbMetrics {
    /// Compute deviations for every patch.
    ///
    /// # Arguments
    ///
    /// * `reference` - Reference RGB per patch
    /// * `measured` - Measured RGB per patch, same order and length
    pub fn compute(reference: &[[f64; 3]], measured: &[[f64; 3]]) -> Self {
        let deviation: Vec<[u32; 3]> = reference
            .iter()
            .zip(measured)
            .map(|(r, m)| {
                [0, 1, 2].map(|channel| round_to((r[channel] - m[channel]).abs(), 0) as u32)
            })
            .collect();

        let total: u64 = deviation
            .iter()
            .flat_map(|d| d.iter())
            .map(|value| u64::from(*value))
            .sum();
        let channels = deviation.len() * 3;
        let mean = if channels == 0 {
            0.0
        } else {
            round2(total as f64 / channels as f64)
        };
        let max = deviation.iter().flat_map(|d| d.iter()).copied().max().unwrap_or(0);

        Self {
            deviation,
            mean,
            max,
        }
    }

    /// Largest channel deviation of one patch
    pub fn patch_max(&self, patch: usize) -> Option<u32> {
        self.deviation.get(patch).and_then(|d| d.iter().copied().max())
    }
}
