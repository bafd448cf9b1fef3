//! Measurement pipeline
//!
//! Ties the components together for one image:
//!
//! 1. Validate the reference table
//! 2. Classify the color space through the probe
//! 3. Locate the target and its patches
//! 4. Sample every patch in index order
//! 5. Compute the metrics for the color space
//! 6. Derive the resolution from the target corners
//! 7. Evaluate against the tolerances
//!
//! Any collaborator failure aborts the run; no partial report is produced.

pub mod batch;
pub mod context;
pub mod engine;
pub mod report;

pub use batch::{evaluate_batch, BatchJob, BatchOutcome};
pub use context::{ColorMetrics, RunContext};
pub use engine::{Collaborators, MeasurementEngine};
pub use report::{GainReport, MeasurementReport, MetricSummary, PatchReport};
