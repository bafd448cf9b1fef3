//! Structured result of one measurement run
//!
//! The report carries every intermediate number and verdict so an external
//! reporting collaborator can persist or display it without recomputing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ColorMetrics, RunContext};
use crate::color::preview::{lab_hex, rgb_hex};
use crate::color::{Aggregate, ColorSpace};
use crate::config::{write_json, ToleranceSpec};
use crate::evaluation::{Evaluation, Verdict};
use crate::gain::GainSlot;
use crate::geometry::Resolution;
use crate::{MeasureError, Result};

/// Values and verdict of one patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchReport {
    /// Patch ordinal (0-based)
    pub index: usize,
    pub reference: [f64; 3],
    pub measured: [f64; 3],
    pub noise: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_e: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_l: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_c: Option<f64>,

    /// Per-channel deviation, RGB runs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<[u32; 3]>,

    /// Hex previews for a results view
    pub reference_hex: String,
    pub measured_hex: String,

    /// ΔE verdict (LAB) or max channel deviation verdict (RGB)
    pub verdict: Verdict,
}

/// One set gain-modulation slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainReport {
    pub slot: GainSlot,
    /// Anchor pair used, e.g. `L*95-L*90`
    pub pair: String,
    pub value: f64,
    /// `None` when the tolerances define no bounds for the slot
    pub verdict: Option<Verdict>,
}

/// Aggregate figures of the run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    /// ΔE over the color patches
    pub delta_e: Option<Aggregate>,
    /// ΔL over the grayscale patches
    pub delta_l: Option<Aggregate>,
    /// ΔC over the grayscale patches
    pub delta_c: Option<Aggregate>,
    /// Mean channel deviation over all patches
    pub mean_deviation_rgb: Option<f64>,
    /// Largest channel deviation over all patches
    pub max_deviation_rgb: Option<u32>,
}

/// Complete result of one measurement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Target name from the reference table
    pub target: String,

    /// Quality level the tolerances describe
    pub quality_level: Option<String>,

    /// `"LAB"` or `"RGB"`
    pub color_space: ColorSpace,

    /// Sample window, e.g. `"5x5"`
    pub stencil: String,

    pub patches: Vec<PatchReport>,
    pub summary: MetricSummary,
    pub gain_modulation: Vec<GainReport>,
    pub resolution: Resolution,
    pub evaluation: Evaluation,

    /// Whether every issued verdict passed
    pub passed: bool,
}

impl MeasurementReport {
    /// Assemble the report from the finished run.
    pub fn build(
        context: &RunContext<'_>,
        metrics: &ColorMetrics,
        resolution: Resolution,
        evaluation: Evaluation,
        tolerances: &ToleranceSpec,
    ) -> Self {
        let reference = context.reference_values();
        let preview: fn([f64; 3]) -> String = match context.color_space {
            ColorSpace::Lab => lab_hex,
            ColorSpace::Rgb => rgb_hex,
        };

        let patches: Vec<PatchReport> = context
            .samples
            .iter()
            .zip(&reference)
            .enumerate()
            .map(|(index, (sample, reference))| {
                let mut patch = PatchReport {
                    index,
                    reference: *reference,
                    measured: sample.measured,
                    noise: sample.noise,
                    delta_e: None,
                    delta_l: None,
                    delta_c: None,
                    deviation: None,
                    reference_hex: preview(*reference),
                    measured_hex: preview(sample.measured),
                    verdict: evaluation.patches.get(index).copied().unwrap_or(Verdict::Fail),
                };
                match metrics {
                    ColorMetrics::Lab { differences, .. } => {
                        patch.delta_e = differences.delta_e.get(index).copied();
                        patch.delta_l = differences.delta_l.get(index).copied().flatten();
                        patch.delta_c = differences.delta_c.get(index).copied().flatten();
                    }
                    ColorMetrics::Rgb(rgb) => {
                        patch.deviation = rgb.deviation.get(index).copied();
                    }
                }
                patch
            })
            .collect();

        let (summary, gain_modulation): (MetricSummary, Vec<GainReport>) = match metrics {
            ColorMetrics::Lab { differences, gain } => (
                MetricSummary {
                    delta_e: differences.delta_e_summary,
                    delta_l: differences.delta_l_summary,
                    delta_c: differences.delta_c_summary,
                    ..MetricSummary::default()
                },
                gain.iter()
                    .map(|(slot, reading)| GainReport {
                        slot,
                        pair: reading.label(),
                        value: reading.value,
                        verdict: evaluation.gain_modulation.get(&slot).copied(),
                    })
                    .collect(),
            ),
            ColorMetrics::Rgb(rgb) => (
                MetricSummary {
                    mean_deviation_rgb: Some(rgb.mean),
                    max_deviation_rgb: Some(rgb.max),
                    ..MetricSummary::default()
                },
                Vec::new(),
            ),
        };

        Self {
            target: context.reference.name.clone(),
            quality_level: tolerances.quality_level.clone(),
            color_space: context.color_space,
            stencil: context.config.stencil_label(),
            patches,
            summary,
            gain_modulation,
            resolution,
            passed: evaluation.passed(),
            evaluation,
        }
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MeasureError::config("serializing measurement report", e))
    }

    /// Save the report to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "measurement report")
    }
}
