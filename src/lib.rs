//! # Scan Quality
//!
//! A Rust crate for measuring the color-reproduction accuracy of scanners,
//! cameras and print processes against a calibration target.
//!
//! This library turns located target patches into verdicts by:
//! - Averaging per-patch pixel samples and estimating their noise
//! - Computing color differences (ΔE, ΔL, ΔC) or RGB channel deviations
//! - Deriving gain modulation from the target's tonal ramp
//! - Deriving the image resolution from the target corners
//! - Evaluating everything against a tolerance set
//!
//! Image decoding, target location and pixel extraction are external
//! collaborators, plugged in through [`ColorSpaceProbe`], [`PatchLocator`]
//! and [`PixelSource`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use scan_quality::{evaluate_target, Collaborators, LocatedTarget, MeasureConfig};
//! use scan_quality::{RecordedPixels, ReferenceTable, ToleranceSpec};
//! use std::path::Path;
//!
//! let reference = ReferenceTable::from_json_file(Path::new("target.json"))?;
//! let tolerances = ToleranceSpec::from_json_file(Path::new("tolerances.json"))?;
//! let located = LocatedTarget::from_json_file(Path::new("located.json"))?;
//! let pixels = RecordedPixels::from_json_file(Path::new("pixels.json"))?;
//! let probe = "'Lab'".to_string();
//!
//! let collaborators = Collaborators {
//!     probe: &probe,
//!     locator: &located,
//!     pixels: &pixels,
//! };
//! let report = evaluate_target(&reference, &tolerances, &MeasureConfig::default(), &collaborators)?;
//! println!("{}: {}", report.target, if report.passed { "PASS" } else { "FAIL" });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod constants;
pub mod config;
pub mod reference;
pub mod sampling;
pub mod color;
pub mod gain;
pub mod geometry;
pub mod evaluation;
pub mod pipeline;

pub use color::{ColorSpace, ColorSpaceProbe};
pub use config::{GainBounds, MeasureConfig, ToleranceSpec};
pub use error::{CollaboratorError, MeasureError, Result};
pub use evaluation::{Evaluation, Verdict};
pub use gain::{GainSlot, SlopeMode};
pub use geometry::{LocatedTarget, PatchLocator, PixelPoint};
pub use pipeline::{
    evaluate_batch, BatchJob, BatchOutcome, Collaborators, MeasurementEngine, MeasurementReport,
};
pub use reference::{ReferenceTable, TargetSize};
pub use sampling::{PixelSource, RecordedPixels};

/// Measure and evaluate one image of a calibration target
///
/// This is the main entry point for a single measurement. It builds a
/// [`MeasurementEngine`] for the inputs and runs it once.
///
/// # Arguments
///
/// * `reference` - Reference colors, ramp anchors and size of the target
/// * `tolerances` - Pass/fail thresholds
/// * `config` - Stencil and gain-modulation settings
/// * `collaborators` - Probe, locator and pixel extractor for the image
///
/// # Returns
///
/// A `MeasurementReport` with every measured value, metric and verdict
///
/// # Errors
///
/// Returns `MeasureError` if:
/// - The reference table or configuration is invalid
/// - The image color space is neither LAB nor RGB
/// - The target or its patches cannot be located
/// - Pixel samples are unavailable for any patch
/// - The target corners cannot yield a resolution
pub fn evaluate_target(
    reference: &ReferenceTable,
    tolerances: &ToleranceSpec,
    config: &MeasureConfig,
    collaborators: &Collaborators<'_>,
) -> Result<MeasurementReport> {
    MeasurementEngine::new(reference, tolerances, config).run(collaborators)
}
