//! Threshold comparisons

use std::collections::BTreeMap;
use tracing::info;

use super::{Evaluation, Verdict};
use crate::color::{LabMetrics, RgbMetrics};
use crate::config::ToleranceSpec;
use crate::gain::GainModulation;

/// Quality evaluator for one tolerance set
#[derive(Debug, Clone)]
pub struct QualityEvaluator<'a> {
    tolerances: &'a ToleranceSpec,
}

impl<'a> QualityEvaluator<'a> {
    pub fn new(tolerances: &'a ToleranceSpec) -> Self {
        Self { tolerances }
    }

    /// Evaluate a LAB run.
    ///
    /// # Arguments
    ///
    /// * `metrics` - ΔE/ΔL/ΔC values and aggregates
    /// * `gain` - Set gain-modulation readings
    ///
    /// # Returns
    ///
    /// Per-patch ΔE verdicts, ΔL/ΔC verdicts over the grayscale patches, the
    /// mean ΔE verdict and one verdict per set slot with bounds
    pub fn evaluate_lab(&self, metrics: &LabMetrics, gain: &GainModulation) -> Evaluation {
        let t = self.tolerances;
        let within = |limit: f64| {
            move |value: &Option<f64>| value.map(|v| Verdict::from_pass(v <= limit))
        };

        let mut gain_modulation = BTreeMap::new();
        for (slot, reading) in gain.iter() {
            if let Some(bounds) = t.gain_bounds(slot) {
                gain_modulation.insert(slot, Verdict::from_pass(bounds.contains(reading.value)));
            }
        }

        let evaluation = Evaluation {
            patches: metrics
                .delta_e
                .iter()
                .map(|de| Verdict::from_pass(*de <= t.max_delta_e))
                .collect(),
            delta_l: metrics.delta_l.iter().map(within(t.max_delta_l)).collect(),
            delta_c: metrics.delta_c.iter().map(within(t.max_delta_c)).collect(),
            mean_delta_e: metrics
                .delta_e_summary
                .map(|summary| Verdict::from_pass(summary.mean <= t.mean_delta_e)),
            gain_modulation,
        };

        log_summary(&evaluation);
        evaluation
    }

    /// Evaluate an RGB run: one verdict per patch on its largest channel
    /// deviation
    pub fn evaluate_rgb(&self, metrics: &RgbMetrics) -> Evaluation {
        let limit = self.tolerances.max_deviation_rgb;
        let patches = (0..metrics.deviation.len())
            .map(|patch| {
                let max = metrics.patch_max(patch).unwrap_or(0);
                Verdict::from_pass(f64::from(max) <= limit)
            })
            .collect();

        let evaluation = Evaluation {
            patches,
            delta_l: Vec::new(),
            delta_c: Vec::new(),
            mean_delta_e: None,
            gain_modulation: BTreeMap::new(),
        };

        log_summary(&evaluation);
        evaluation
    }
}

fn log_summary(evaluation: &Evaluation) {
    let failed = evaluation.failed_patches();
    info!(
        passed = evaluation.passed(),
        verdicts = evaluation.verdicts().count(),
        failed_patches = failed.len(),
        "Evaluation complete"
    );
}
