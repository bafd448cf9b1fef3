//! Batch evaluation of several images of the same target

use tracing::{info, warn};

use super::{Collaborators, MeasurementEngine, MeasurementReport};
use crate::config::{MeasureConfig, ToleranceSpec};
use crate::reference::ReferenceTable;
use crate::Result;

/// One image to measure
#[derive(Clone, Copy)]
pub struct BatchJob<'c> {
    /// Display name, usually the image file name
    pub name: &'c str,
    pub collaborators: Collaborators<'c>,
}

/// Result of one batch job
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<MeasurementReport>,
}

impl BatchOutcome {
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(report) if report.passed)
    }
}

/// Run every job with its own engine and collect the outcomes in job order.
///
/// A failing job is recorded and the batch moves on to the next one.
pub fn evaluate_batch(
    reference: &ReferenceTable,
    tolerances: &ToleranceSpec,
    config: &MeasureConfig,
    jobs: &[BatchJob<'_>],
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = jobs
        .iter()
        .map(|job| {
            let engine = MeasurementEngine::new(reference, tolerances, config);
            let result = engine.run(&job.collaborators);
            if let Err(e) = &result {
                warn!(job = job.name, error = %e, "Batch job failed");
            }
            BatchOutcome {
                name: job.name.to_string(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let passed = outcomes.iter().filter(|o| o.passed()).count();
    info!(jobs = outcomes.len(), passed, failed, "Batch complete");
    outcomes
}
