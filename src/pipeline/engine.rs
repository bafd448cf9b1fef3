//! Measurement engine: drives one run from reference data to verdicts

use tracing::{debug, info, instrument};

use super::{ColorMetrics, MeasurementReport, RunContext};
use crate::color::{ColorSpace, ColorSpaceProbe, LabMetrics, RgbMetrics};
use crate::config::{MeasureConfig, ToleranceSpec};
use crate::evaluation::{Evaluation, QualityEvaluator};
use crate::gain::GainModulationSelector;
use crate::geometry::{PatchLocator, Resolution, ResolutionCalculator, TargetGeometry};
use crate::reference::ReferenceTable;
use crate::sampling::{PatchSampler, PixelSource};
use crate::{MeasureError, Result};

/// External collaborators consulted during one run
#[derive(Clone, Copy)]
pub struct Collaborators<'c> {
    pub probe: &'c dyn ColorSpaceProbe,
    pub locator: &'c dyn PatchLocator,
    pub pixels: &'c dyn PixelSource,
}

/// Measurement engine for one image.
///
/// Holds read-only inputs only. All per-run state lives in the
/// [`RunContext`] created by [`MeasurementEngine::run`].
#[derive(Debug, Clone, Copy)]
pub struct MeasurementEngine<'a> {
    reference: &'a ReferenceTable,
    tolerances: &'a ToleranceSpec,
    config: &'a MeasureConfig,
}

impl<'a> MeasurementEngine<'a> {
    pub fn new(
        reference: &'a ReferenceTable,
        tolerances: &'a ToleranceSpec,
        config: &'a MeasureConfig,
    ) -> Self {
        Self {
            reference,
            tolerances,
            config,
        }
    }

    /// Measure and evaluate one image.
    ///
    /// Stages run strictly in order: reference validation, color-space
    /// classification, patch location, sampling, metrics, resolution and
    /// evaluation.
    ///
    /// # Arguments
    ///
    /// * `collaborators` - Probe, locator and pixel extractor for the image
    ///
    /// # Returns
    ///
    /// The complete report with every intermediate value and verdict
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by any stage:
    /// - `InvalidReference` if the reference table is inconsistent
    /// - `ColorSpaceUndetermined` if the image is neither LAB nor RGB
    /// - `LocatorFailure` if the target or its patches were not found
    /// - `SamplingUnavailable` if pixel extraction failed for any patch
    /// - `GeometryDegenerate` if no resolution can be derived
    #[instrument(skip_all, fields(reference = %self.reference.name))]
    pub fn run(&self, collaborators: &Collaborators<'_>) -> Result<MeasurementReport> {
        let context = self.prepare(collaborators)?;
        let context = self.sample(context, collaborators.pixels)?;
        let metrics = self.compute_metrics(&context);
        let resolution = self.resolve(&context)?;
        let evaluation = self.evaluate(&metrics);

        let report =
            MeasurementReport::build(&context, &metrics, resolution, evaluation, self.tolerances);
        info!(
            color_space = %context.color_space,
            passed = report.passed,
            "Measurement run complete"
        );
        Ok(report)
    }

    /// Validate inputs, classify the color space and locate the target
    fn prepare(&self, collaborators: &Collaborators<'_>) -> Result<RunContext<'a>> {
        self.config.validate()?;
        self.reference.validate()?;

        let color_space = ColorSpace::detect(collaborators.probe)?;
        self.reference.validate_for(color_space)?;

        let located = collaborators
            .locator
            .locate(self.reference)
            .map_err(|e| MeasureError::LocatorFailure { reason: e.message })?;
        located.check_against(self.reference)?;
        debug!(
            patches = located.patch_centers.len(),
            corners = located.corners.len(),
            "Target located"
        );

        Ok(RunContext::new(self.reference, self.config, color_space, located))
    }

    fn sample(&self, context: RunContext<'a>, pixels: &dyn PixelSource) -> Result<RunContext<'a>> {
        let sampler = PatchSampler::new(context.color_space, self.config.stencil)?;
        let centers = &context.located.patch_centers[..self.reference.num_patches()];
        let samples = sampler.sample_all(centers, pixels)?;
        Ok(context.with_samples(samples))
    }

    fn compute_metrics(&self, context: &RunContext<'_>) -> ColorMetrics {
        let reference = context.reference_values();
        let measured = context.measured_values();

        match context.color_space {
            ColorSpace::Lab => {
                let differences =
                    LabMetrics::compute(&reference, &measured, self.reference.partition);
                let reference_l: Vec<f64> = reference.iter().map(|lab| lab[0]).collect();
                let measured_l: Vec<f64> = measured.iter().map(|lab| lab[0]).collect();
                let gain = GainModulationSelector::new(self.config.slope_mode).compute(
                    &self.reference.ramp,
                    &reference_l,
                    &measured_l,
                );
                ColorMetrics::Lab { differences, gain }
            }
            ColorSpace::Rgb => ColorMetrics::Rgb(RgbMetrics::compute(&reference, &measured)),
        }
    }

    fn resolve(&self, context: &RunContext<'_>) -> Result<Resolution> {
        let corners = context
            .located
            .length_corners()
            .ok_or_else(|| MeasureError::LocatorFailure {
                reason: "target length corners missing".into(),
            })?;
        ResolutionCalculator::new().compute(&TargetGeometry {
            corners,
            size: self.reference.size,
        })
    }

    fn evaluate(&self, metrics: &ColorMetrics) -> Evaluation {
        let evaluator = QualityEvaluator::new(self.tolerances);
        match metrics {
            ColorMetrics::Lab { differences, gain } => evaluator.evaluate_lab(differences, gain),
            ColorMetrics::Rgb(deviation) => evaluator.evaluate_rgb(deviation),
        }
    }
}
