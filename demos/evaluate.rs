//! Evaluate one recorded measurement from JSON files
//!
//! Replays a locator placement and recorded pixel samples against a
//! reference table and prints the verdicts.

use scan_quality::{
    evaluate_target, Collaborators, LocatedTarget, MeasureConfig, MeasurementReport,
    RecordedPixels, ReferenceTable, ToleranceSpec,
};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 6 {
        print_help(&args[0]);
        process::exit(1);
    }

    let load = || -> scan_quality::Result<_> {
        Ok((
            ReferenceTable::from_json_file(Path::new(&args[1]))?,
            ToleranceSpec::from_json_file(Path::new(&args[2]))?,
            LocatedTarget::from_json_file(Path::new(&args[3]))?,
            RecordedPixels::from_json_file(Path::new(&args[4]))?,
        ))
    };
    let (reference, tolerances, located, pixels) = match load() {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error loading inputs: {}", e);
            process::exit(1);
        }
    };

    let config = match env::var("MEASURE_CONFIG") {
        Ok(path) => match MeasureConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config file: {}", e);
                process::exit(1);
            }
        },
        Err(_) => MeasureConfig::default(),
    };

    let probe = args[5].clone();
    let collaborators = Collaborators {
        probe: &probe,
        locator: &located,
        pixels: &pixels,
    };

    let report = match evaluate_target(&reference, &tolerances, &config, &collaborators) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("✗ {}", e.user_message());
            eprintln!("  ({})", e);
            process::exit(2);
        }
    };

    print_summary(&report);

    if let Some(output) = args.get(6) {
        if let Err(e) = report.to_json_file(Path::new(output)) {
            eprintln!("Error saving report: {}", e);
            process::exit(1);
        }
        eprintln!("Report saved to {}", output);
    }

    if !report.passed {
        process::exit(3);
    }
}

fn print_summary(report: &MeasurementReport) {
    println!("Target:      {}", report.target);
    if let Some(level) = &report.quality_level {
        println!("Quality:     {}", level);
    }
    println!("Color space: {}", report.color_space);
    println!("Stencil:     {}", report.stencil);
    println!(
        "Resolution:  {:.2} ppi ({} px)",
        report.resolution.ppi, report.resolution.target_length_px
    );
    println!();

    for patch in &report.patches {
        let metric = match (patch.delta_e, patch.deviation) {
            (Some(de), _) => format!("ΔE {:>6.2}", de),
            (None, Some(dev)) => format!("dev {:?}", dev),
            (None, None) => String::new(),
        };
        println!(
            "  #{:<3} {} -> {}  {}  noise {:>4.1}  {}",
            patch.index + 1,
            patch.reference_hex,
            patch.measured_hex,
            metric,
            patch.noise,
            patch.verdict
        );
    }

    if let Some(summary) = report.summary.delta_e {
        println!();
        println!("ΔE max {:.2}, mean {:.2} over {} color patches", summary.max, summary.mean, summary.count);
    }
    for gain in &report.gain_modulation {
        let verdict = gain.verdict.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
        println!("Gain {} ({}): {:.2} {}", gain.slot, gain.pair, gain.value, verdict);
    }

    println!();
    println!("Result: {}", if report.passed { "PASS" } else { "FAIL" });
}

fn print_help(program_name: &str) {
    eprintln!(
        "Usage: {} <target.json> <tolerances.json> <located.json> <pixels.json> <colorspace> [report.json]",
        program_name
    );
    eprintln!();
    eprintln!("Evaluate a calibration target from recorded collaborator output.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  colorspace     Label reported for the image, e.g. \"'Lab'\" or \"'RGB'\"");
    eprintln!("  report.json    Optional path for the full JSON report");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MEASURE_CONFIG Path to a measurement config (stencil, slope mode)");
    eprintln!("  RUST_LOG       Log filter, e.g. scan_quality=debug");
}
