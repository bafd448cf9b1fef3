//! Batch evaluation with a JSON job file
//!
//! Evaluates several recorded images of the same target. The job file names
//! the shared inputs and one entry per image:
//!
//! ```json
//! {
//!   "target": "target.json",
//!   "tolerances": "tolerances.json",
//!   "jobs": [
//!     { "name": "scan_001.tif", "colorspace": "'Lab'",
//!       "located": "scan_001.located.json", "pixels": "scan_001.pixels.json" }
//!   ]
//! }
//! ```
//!
//! Relative paths are resolved against the job file's directory.

use scan_quality::{
    evaluate_batch, BatchJob, BatchOutcome, Collaborators, LocatedTarget, MeasureConfig, RecordedPixels,
    ReferenceTable, ToleranceSpec,
};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct JobFile {
    target: PathBuf,
    tolerances: PathBuf,
    #[serde(default)]
    config: Option<PathBuf>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    jobs: Vec<JobEntry>,
}

#[derive(Deserialize)]
struct JobEntry {
    name: String,
    colorspace: String,
    located: PathBuf,
    pixels: PathBuf,
}

/// Collaborator data of one job, loaded up front
struct LoadedJob {
    name: String,
    probe: String,
    located: LocatedTarget,
    pixels: RecordedPixels,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <jobs.json>", args[0]);
        eprintln!();
        eprintln!("Evaluate recorded scans of one calibration target.");
        process::exit(1);
    }

    let job_path = Path::new(&args[1]);
    let base = job_path.parent().unwrap_or_else(|| Path::new("."));

    let job_file: JobFile = match std::fs::read_to_string(job_path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error loading job file '{}': {}", job_path.display(), e);
            process::exit(1);
        }
    };

    let shared = (|| -> scan_quality::Result<_> {
        let config = match &job_file.config {
            Some(path) => MeasureConfig::from_json_file(&base.join(path))?,
            None => MeasureConfig::default(),
        };
        Ok((
            ReferenceTable::from_json_file(&base.join(&job_file.target))?,
            ToleranceSpec::from_json_file(&base.join(&job_file.tolerances))?,
            config,
        ))
    })();
    let (reference, tolerances, config) = match shared {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error loading shared inputs: {}", e);
            process::exit(1);
        }
    };

    let mut loaded = Vec::with_capacity(job_file.jobs.len());
    let mut skipped = 0;
    for entry in &job_file.jobs {
        let job = LocatedTarget::from_json_file(&base.join(&entry.located)).and_then(|located| {
            Ok(LoadedJob {
                name: entry.name.clone(),
                probe: entry.colorspace.clone(),
                located,
                pixels: RecordedPixels::from_json_file(&base.join(&entry.pixels))?,
            })
        });
        match job {
            Ok(job) => loaded.push(job),
            Err(e) => {
                eprintln!("Skipping {}: {}", entry.name, e);
                skipped += 1;
            }
        }
    }

    let jobs: Vec<BatchJob<'_>> = loaded
        .iter()
        .map(|job| BatchJob {
            name: &job.name,
            collaborators: Collaborators {
                probe: &job.probe,
                locator: &job.located,
                pixels: &job.pixels,
            },
        })
        .collect();

    eprintln!("Evaluating {} scans of '{}'", jobs.len(), reference.name);
    eprintln!();

    let outcomes = evaluate_batch(&reference, &tolerances, &config, &jobs);

    for (i, outcome) in outcomes.iter().enumerate() {
        match &outcome.result {
            Ok(report) => {
                let verdict = if report.passed { "PASS" } else { "FAIL" };
                eprintln!(
                    "[{}/{}] {} {} ({}, {:.2} ppi)",
                    i + 1,
                    outcomes.len(),
                    outcome.name,
                    verdict,
                    report.color_space,
                    report.resolution.ppi
                );
                if let Some(dir) = &job_file.output_dir {
                    let path = base.join(dir).join(format!("{}.report.json", outcome.name));
                    if let Err(e) = report.to_json_file(&path) {
                        eprintln!("  Warning saving report: {}", e);
                    }
                }
            }
            Err(e) => {
                eprintln!("[{}/{}] {} ✗ {}", i + 1, outcomes.len(), outcome.name, e);
            }
        }
    }

    eprintln!();
    let (passed, failed) = tally(&outcomes, skipped);
    eprintln!("Batch processing complete:");
    eprintln!("  Passed: {}", passed);
    eprintln!("  Failed: {}", failed);
    if skipped > 0 {
        eprintln!("  (including {} not loaded)", skipped);
    }

    if failed > 0 {
        process::exit(1);
    }
}

/// Passed and failed job counts; jobs whose inputs never loaded count as failed
fn tally(outcomes: &[BatchOutcome], skipped: usize) -> (usize, usize) {
    let passed = outcomes.iter().filter(|outcome| outcome.passed()).count();
    (passed, outcomes.len() - passed + skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_quality::MeasureError;

    fn lost(name: &str) -> BatchOutcome {
        BatchOutcome {
            name: name.into(),
            result: Err(MeasureError::LocatorFailure {
                reason: "target not found".into(),
            }),
        }
    }

    #[test]
    fn test_unloaded_jobs_count_as_failed() {
        assert_eq!(tally(&[], 3), (0, 3));
    }

    #[test]
    fn test_run_failures_and_skips_add_up() {
        assert_eq!(tally(&[lost("a.tif"), lost("b.tif")], 1), (0, 3));
        assert_eq!(tally(&[], 0), (0, 0));
    }
}
