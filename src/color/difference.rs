//! Perceptual color differences per patch and over patch sub-ranges
//!
//! Algorithm: CIE76 ΔE (Euclidean distance in L*a*b*), with lightness-only
//! (ΔL) and chroma-only (ΔC) components for the grayscale patches.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::warn;

use super::rounding::round2;
use crate::reference::Partition;

/// Max and mean of a metric over a patch sub-range, two decimals each
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub max: f64,
    pub mean: f64,
    /// Patches that contributed
    pub count: usize,
}

impl Aggregate {
    /// Aggregate unrounded values; `None` for an empty sub-range
    pub fn over<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut max = 0.0_f64;
        let mut sum = 0.0;
        let mut count = 0;
        for value in values {
            max = max.max(value);
            sum += value;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            max: round2(max),
            mean: round2(sum / count as f64),
            count,
        })
    }
}

/// Unrounded CIE76 ΔE between reference and measured L*a*b*
pub fn delta_e(reference: [f64; 3], measured: [f64; 3]) -> f64 {
    let dl = reference[0] - measured[0];
    let da = reference[1] - measured[1];
    let db = reference[2] - measured[2];
    (dl * dl + da * da + db * db).sqrt()
}

/// Unrounded lightness difference
pub fn delta_l(reference: [f64; 3], measured: [f64; 3]) -> f64 {
    (reference[0] - measured[0]).abs()
}

/// Unrounded chroma-plane difference
pub fn delta_c(reference: [f64; 3], measured: [f64; 3]) -> f64 {
    let da = reference[1] - measured[1];
    let db = reference[2] - measured[2];
    (da * da + db * db).sqrt()
}

/// ΔE for every patch, ΔL/ΔC for the grayscale patches, and their aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabMetrics {
    /// ΔE per patch, two decimals
    pub delta_e: Vec<f64>,

    /// ΔL per patch; `None` outside the grayscale sub-range
    pub delta_l: Vec<Option<f64>>,

    /// ΔC per patch; `None` outside the grayscale sub-range
    pub delta_c: Vec<Option<f64>>,

    /// Max/mean ΔE over the color sub-range
    pub delta_e_summary: Option<Aggregate>,

    /// Max/mean ΔL over the grayscale sub-range
    pub delta_l_summary: Option<Aggregate>,

    /// Max/mean ΔC over the grayscale sub-range
    pub delta_c_summary: Option<Aggregate>,

    /// Grayscale sub-range the ΔL/ΔC values cover
    pub grayscale: Range<usize>,
}

impl LabMetrics {
    /// Compute all LAB metrics.
    ///
    /// # Arguments
    ///
    /// * `reference` - Reference L*a*b* per patch
    /// * `measured` - Measured L*a*b* per patch, same order and length
    /// * `partition` - Grayscale/color split of the patch sequence
    pub fn compute(reference: &[[f64; 3]], measured: &[[f64; 3]], partition: Partition) -> Self {
        let n = reference.len().min(measured.len());
        let pairs: Vec<([f64; 3], [f64; 3])> = reference
            .iter()
            .copied()
            .zip(measured.iter().copied())
            .collect();

        let raw_e: Vec<f64> = pairs.iter().map(|(r, m)| delta_e(*r, *m)).collect();
        let color = partition.color_range(n);
        let delta_e_summary = Aggregate::over(raw_e[color].iter().copied());

        let grayscale = partition.grayscale_range(n);
        let raw_l: Vec<f64> = pairs[grayscale.clone()]
            .iter()
            .map(|(r, m)| delta_l(*r, *m))
            .collect();
        let raw_c: Vec<f64> = pairs[grayscale.clone()]
            .iter()
            .map(|(r, m)| delta_c(*r, *m))
            .collect();

        if delta_e_summary.is_none() {
            warn!("No color patches in partition, skipping ΔE aggregate");
        }
        if grayscale.is_empty() {
            warn!("No grayscale patches in partition, skipping ΔL/ΔC aggregates");
        }

        let mut delta_l = vec![None; n];
        let mut delta_c = vec![None; n];
        for (offset, index) in grayscale.clone().enumerate() {
            delta_l[index] = Some(round2(raw_l[offset]));
            delta_c[index] = Some(round2(raw_c[offset]));
        }

        Self {
            delta_e: raw_e.iter().map(|v| round2(*v)).collect(),
            delta_l,
            delta_c,
            delta_e_summary,
            delta_l_summary: Aggregate::over(raw_l),
            delta_c_summary: Aggregate::over(raw_c),
            grayscale,
        }
    }
}
