//! Per-run state passed between pipeline stages

use serde::{Deserialize, Serialize};

use crate::color::{ColorSpace, LabMetrics, RgbMetrics};
use crate::config::MeasureConfig;
use crate::gain::GainModulation;
use crate::geometry::LocatedTarget;
use crate::reference::ReferenceTable;
use crate::sampling::PatchSample;

/// Everything one run has established so far.
///
/// Owned by a single run. Each stage takes the context by value and hands
/// back the extended one, so batch runs never share state.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    pub reference: &'a ReferenceTable,
    pub config: &'a MeasureConfig,

    /// Classified once, before any pixel is read
    pub color_space: ColorSpace,

    /// Locator output, already checked against the reference
    pub located: LocatedTarget,

    /// Samples in patch order; empty until the sampling stage ran
    pub samples: Vec<PatchSample>,
}

impl<'a> RunContext<'a> {
    pub fn new(
        reference: &'a ReferenceTable,
        config: &'a MeasureConfig,
        color_space: ColorSpace,
        located: LocatedTarget,
    ) -> Self {
        Self {
            reference,
            config,
            color_space,
            located,
            samples: Vec::new(),
        }
    }

    pub fn with_samples(mut self, samples: Vec<PatchSample>) -> Self {
        self.samples = samples;
        self
    }

    /// Reference triplets in the run's color space
    pub fn reference_values(&self) -> Vec<[f64; 3]> {
        self.reference.values(self.color_space)
    }

    /// Measured triplets in patch order
    pub fn measured_values(&self) -> Vec<[f64; 3]> {
        self.samples.iter().map(|sample| sample.measured).collect()
    }
}

/// Metrics computed for the run's color space.
///
/// LAB runs get color differences and gain modulation; RGB runs get channel
/// deviations only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorMetrics {
    Lab {
        differences: LabMetrics,
        gain: GainModulation,
    },
    Rgb(RgbMetrics),
}

impl ColorMetrics {
    pub fn color_space(&self) -> ColorSpace {
        match self {
            ColorMetrics::Lab { .. } => ColorSpace::Lab,
            ColorMetrics::Rgb(_) => ColorSpace::Rgb,
        }
    }
}
