//! Generate default configuration files
//!
//! Writes baseline tolerances and measurement settings as JSON

use scan_quality::{MeasureConfig, ToleranceSpec};
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_dir> [quality_level]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} configs/ \"production\"", args[0]);
        process::exit(1);
    }

    let output_dir = Path::new(&args[1]);

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!("Error creating directory: {}", e);
        process::exit(1);
    }

    let mut tolerances = ToleranceSpec::default();
    tolerances.quality_level = args.get(2).cloned();
    let config = MeasureConfig::default();

    let tolerance_path = output_dir.join("tolerances.json");
    let config_path = output_dir.join("config.json");

    if let Err(e) = tolerances
        .to_json_file(&tolerance_path)
        .and_then(|_| config.to_json_file(&config_path))
    {
        eprintln!("Error saving config: {}", e);
        process::exit(1);
    }

    eprintln!("Tolerances saved to {}", tolerance_path.display());
    eprintln!("Measurement config saved to {}", config_path.display());
    eprintln!();
    eprintln!("Tolerance summary:");
    eprintln!(
        "  ΔE max {:.1}, mean {:.1}; ΔL max {:.1}; ΔC max {:.1}",
        tolerances.max_delta_e, tolerances.mean_delta_e, tolerances.max_delta_l, tolerances.max_delta_c
    );
    eprintln!("  RGB deviation max {:.0}", tolerances.max_deviation_rgb);
    for (slot, bounds) in &tolerances.gain_modulation {
        eprintln!("  Gain {}: {:.2}-{:.2}", slot, bounds.min, bounds.max);
    }
    eprintln!("Settings: stencil {}, slope {:?}", config.stencil_label(), config.slope_mode);
}
