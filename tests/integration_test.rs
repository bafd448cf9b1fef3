//! Integration tests for the complete measurement pipeline
//!
//! These tests drive `evaluate_target` end to end with in-memory
//! collaborators standing in for the probe, locator and pixel extractor:
//! - LAB runs with color differences and gain modulation
//! - RGB runs with channel deviations
//! - Fatal collaborator and geometry failures
//! - Partition and ramp-anchor edge cases
//! - JSON input files and report output

use scan_quality::reference::{LabColor, Partition, RampAnchors, ReferencePatch, RgbColor};
use scan_quality::sampling::{RawPixel, SampleWindow};
use scan_quality::{
    evaluate_target, CollaboratorError, ColorSpace, ColorSpaceProbe, Collaborators, GainSlot,
    LocatedTarget, MeasureConfig, MeasureError, MeasurementReport, PatchLocator, PixelPoint,
    PixelSource, ReferenceTable, TargetSize, ToleranceSpec, Verdict,
};

// ============================================================================
// Test Doubles
// ============================================================================

/// Lightness ramp printed at 95, 90, 85, 80, 25, 20, 10 and 5 percent
const RAMP: [f64; 8] = [95.0, 90.0, 85.0, 80.0, 25.0, 20.0, 10.0, 5.0];

/// Color patches following the ramp
const COLORS: [[f64; 3]; 4] = [
    [60.0, 40.0, -30.0],
    [45.0, -20.0, 35.0],
    [70.0, 10.0, 60.0],
    [30.0, 25.0, -50.0],
];

/// Extractor double returning a uniform window per patch, encoded the way
/// the real extractor delivers 8-bit LAB or RGB codes
struct UniformPixels {
    values: Vec<[f64; 3]>,
    color_space: ColorSpace,
    fail_on: Option<usize>,
}

impl UniformPixels {
    fn new(values: Vec<[f64; 3]>, color_space: ColorSpace) -> Self {
        Self {
            values,
            color_space,
            fail_on: None,
        }
    }

    fn encode(&self, value: [f64; 3]) -> RawPixel {
        let signed = |v: f64| if v < 0.0 { v + 256.0 } else { v };
        match self.color_space {
            ColorSpace::Lab => [value[0] * 255.0 / 100.0, signed(value[1]), signed(value[2])],
            ColorSpace::Rgb => value,
        }
    }
}

impl PixelSource for UniformPixels {
    fn window_samples(&self, window: &SampleWindow) -> Result<Vec<RawPixel>, CollaboratorError> {
        if self.fail_on == Some(window.patch) {
            return Err(CollaboratorError::new("convert: no images defined"));
        }
        let value = self
            .values
            .get(window.patch)
            .copied()
            .ok_or_else(|| CollaboratorError::new("window outside image"))?;
        Ok(vec![self.encode(value); window.area()])
    }
}

struct Probe(&'static str);

impl ColorSpaceProbe for Probe {
    fn colorspace_label(&self) -> Result<String, CollaboratorError> {
        Ok(self.0.to_string())
    }
}

struct LostTarget;

impl PatchLocator for LostTarget {
    fn locate(&self, _reference: &ReferenceTable) -> Result<LocatedTarget, CollaboratorError> {
        Err(CollaboratorError::new("no target match above threshold"))
    }
}

fn lab_target(anchors: [usize; 8]) -> ReferenceTable {
    let patches = RAMP
        .iter()
        .map(|l| [*l, 0.0, 0.0])
        .chain(COLORS)
        .map(|lab| ReferencePatch {
            lab: Some(LabColor::new(lab[0], lab[1], lab[2])),
            rgb: None,
        })
        .collect();
    ReferenceTable {
        name: "ramp and colors".into(),
        patches,
        partition: Partition::new(true, RAMP.len()),
        ramp: RampAnchors::from_one_based(anchors),
        size: TargetSize {
            length_cm: 10.0,
            width_cm: 4.0,
        },
    }
}

fn lab_values(table: &ReferenceTable) -> Vec<[f64; 3]> {
    table.values(ColorSpace::Lab)
}

fn placement(n: usize, far_corner: PixelPoint) -> LocatedTarget {
    LocatedTarget {
        patch_centers: (0..n as i64).map(|i| PixelPoint::new(20 + 25 * i, 40)).collect(),
        corners: vec![PixelPoint::new(0, 0), far_corner, PixelPoint::new(0, 120)],
    }
}

fn run(
    table: &ReferenceTable,
    tolerances: &ToleranceSpec,
    probe: &dyn ColorSpaceProbe,
    locator: &dyn PatchLocator,
    pixels: &dyn PixelSource,
) -> Result<MeasurementReport, MeasureError> {
    let collaborators = Collaborators {
        probe,
        locator,
        pixels,
    };
    evaluate_target(table, tolerances, &MeasureConfig::default(), &collaborators)
}

fn run_lab(table: &ReferenceTable, measured: Vec<[f64; 3]>) -> MeasurementReport {
    let locator = placement(table.num_patches(), PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(measured, ColorSpace::Lab);
    run(table, &ToleranceSpec::default(), &Probe("'Lab'"), &locator, &pixels)
        .expect("LAB run should succeed")
}

// ============================================================================
// LAB Runs
// ============================================================================

#[test]
fn test_exact_reproduction_passes() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let report = run_lab(&table, lab_values(&table));

    assert!(report.passed);
    assert_eq!(report.color_space, ColorSpace::Lab);
    assert_eq!(report.target, "ramp and colors");
    assert_eq!(report.patches.len(), 12);
    assert!(report.patches.iter().all(|p| p.delta_e == Some(0.0)));
    assert!(report.patches.iter().all(|p| p.noise == 0.0));

    let summary = report.summary.delta_e.expect("color patches present");
    assert_eq!(summary.count, COLORS.len());
    assert_eq!(summary.max, 0.0);
}

#[test]
fn test_grayscale_metrics_only_on_grayscale_patches() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let report = run_lab(&table, lab_values(&table));

    assert!(report.patches[..8].iter().all(|p| p.delta_l.is_some() && p.delta_c.is_some()));
    assert!(report.patches[8..].iter().all(|p| p.delta_l.is_none() && p.delta_c.is_none()));
    assert_eq!(report.summary.delta_l.map(|a| a.count), Some(8));
}

#[test]
fn test_single_patch_difference_scenario() {
    let table = ReferenceTable {
        name: "mid gray".into(),
        patches: vec![ReferencePatch {
            lab: Some(LabColor::new(50.0, 0.0, 0.0)),
            rgb: None,
        }],
        partition: Partition::new(true, 0),
        ramp: RampAnchors::default(),
        size: TargetSize {
            length_cm: 10.0,
            width_cm: 4.0,
        },
    };
    let report = run_lab(&table, vec![[53.0, 4.0, 0.0]]);
    let patch = &report.patches[0];

    assert_eq!(patch.measured, [53.0, 4.0, 0.0]);
    assert_eq!(patch.delta_e, Some(5.0));
    assert_eq!(patch.delta_l, Some(3.0));
    assert_eq!(patch.delta_c, Some(4.0));
    assert_eq!(patch.verdict, Verdict::Pass);
}

#[test]
fn test_color_shift_fails_patch_and_mean() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let mut measured = lab_values(&table);
    for value in &mut measured[8..] {
        value[1] += 12.0;
    }
    let report = run_lab(&table, measured);

    assert!(!report.passed);
    assert_eq!(report.evaluation.failed_patches(), vec![8, 9, 10, 11]);
    assert_eq!(report.evaluation.mean_delta_e, Some(Verdict::Fail));
    assert_eq!(report.summary.delta_e.map(|a| a.mean), Some(12.0));
}

#[test]
fn test_previews_follow_reference_colors() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let report = run_lab(&table, lab_values(&table));
    for patch in &report.patches {
        assert_eq!(patch.reference_hex, patch.measured_hex);
        assert_eq!(patch.reference_hex.len(), 7);
    }
}

// ============================================================================
// Gain Modulation
// ============================================================================

#[test]
fn test_full_ramp_fills_every_slot() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let report = run_lab(&table, lab_values(&table));

    let pairs: Vec<(GainSlot, &str)> = report
        .gain_modulation
        .iter()
        .map(|g| (g.slot, g.pair.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (GainSlot::HighlightsHigh, "L*95-L*90"),
            (GainSlot::HighlightsLow, "L*90-L*85"),
            (GainSlot::Midtone, "L*85-L*25"),
            (GainSlot::Shadow, "L*85-L*10"),
        ]
    );
    assert!(report.gain_modulation.iter().all(|g| g.value == 1.0));
    assert!(report.gain_modulation.iter().all(|g| g.verdict == Some(Verdict::Pass)));
}

#[test]
fn test_partial_anchor_scenario() {
    let table = lab_target([1, 2, 3, 0, 5, 0, 7, 0]);
    let report = run_lab(&table, lab_values(&table));

    let pair = |slot: GainSlot| {
        report
            .gain_modulation
            .iter()
            .find(|g| g.slot == slot)
            .map(|g| g.pair.clone())
    };
    assert_eq!(pair(GainSlot::HighlightsHigh).as_deref(), Some("L*95-L*90"));
    assert_eq!(pair(GainSlot::Midtone).as_deref(), Some("L*85-L*25"));
    assert_eq!(pair(GainSlot::Shadow).as_deref(), Some("L*85-L*10"));
}

#[test]
fn test_highlight_fallback_when_neighbors_missing() {
    // Only L95 and L80 printed in the highlights
    let table = lab_target([1, 0, 0, 4, 5, 0, 0, 0]);
    let report = run_lab(&table, lab_values(&table));

    let high = report
        .gain_modulation
        .iter()
        .find(|g| g.slot == GainSlot::HighlightsHigh)
        .expect("fallback pair used");
    assert_eq!(high.pair, "L*95-L*80");
    assert!(report.gain_modulation.iter().all(|g| g.slot != GainSlot::HighlightsLow));
}

#[test]
fn test_compressed_tone_curve_fails_gain() {
    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    let mut measured = lab_values(&table);
    for value in &mut measured[..8] {
        value[0] = 50.0 + 0.5 * (value[0] - 50.0);
    }
    let report = run_lab(&table, measured);

    assert!(!report.passed);
    assert!(report
        .gain_modulation
        .iter()
        .all(|g| g.value == 0.5 && g.verdict == Some(Verdict::Fail)));
}

#[test]
fn test_no_anchors_no_gain_verdicts() {
    let table = lab_target([0; 8]);
    let report = run_lab(&table, lab_values(&table));
    assert!(report.gain_modulation.is_empty());
    assert!(report.evaluation.gain_modulation.is_empty());
    assert!(report.passed);
}

// ============================================================================
// Partition Edge Cases
// ============================================================================

#[test]
fn test_split_zero_matches_full_split() {
    let mut zero = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    zero.partition = Partition::new(false, 0);
    let mut full = zero.clone();
    full.partition = Partition::new(false, full.num_patches());

    let mut measured = lab_values(&zero);
    measured[3][0] += 1.5;
    assert_eq!(run_lab(&zero, measured.clone()), run_lab(&full, measured));
}

#[test]
fn test_all_color_target_has_no_grayscale_aggregates() {
    let mut table = lab_target([0; 8]);
    table.partition = Partition::new(false, 0);
    let report = run_lab(&table, lab_values(&table));

    assert!(report.summary.delta_l.is_none());
    assert!(report.summary.delta_c.is_none());
    assert_eq!(report.summary.delta_e.map(|a| a.count), Some(12));
    assert!(report.passed);
}

// ============================================================================
// RGB Runs
// ============================================================================

fn rgb_target() -> ReferenceTable {
    ReferenceTable {
        name: "rgb chart".into(),
        patches: vec![
            ReferencePatch {
                lab: None,
                rgb: Some(RgbColor::new(120, 120, 120)),
            },
            ReferencePatch {
                lab: None,
                rgb: Some(RgbColor::new(200, 40, 40)),
            },
        ],
        partition: Partition::new(true, 1),
        ramp: RampAnchors::default(),
        size: TargetSize {
            length_cm: 10.0,
            width_cm: 4.0,
        },
    }
}

#[test]
fn test_rgb_deviation_scenario() {
    let table = rgb_target();
    let locator = placement(2, PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(
        vec![[125.0, 117.0, 130.0], [200.0, 40.0, 40.0]],
        ColorSpace::Rgb,
    );
    let report = run(&table, &ToleranceSpec::default(), &Probe("'RGB'"), &locator, &pixels).unwrap();

    assert_eq!(report.color_space, ColorSpace::Rgb);
    assert_eq!(report.patches[0].deviation, Some([5, 3, 10]));
    assert_eq!(report.patches[0].delta_e, None);
    assert_eq!(report.summary.max_deviation_rgb, Some(10));
    assert_eq!(report.summary.mean_deviation_rgb, Some(3.0));
    assert!(report.gain_modulation.is_empty());
    assert!(report.passed);
}

#[test]
fn test_rgb_deviation_over_tolerance_fails() {
    let table = rgb_target();
    let locator = placement(2, PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(
        vec![[120.0, 120.0, 120.0], [200.0, 60.0, 40.0]],
        ColorSpace::Rgb,
    );
    let report = run(&table, &ToleranceSpec::default(), &Probe("RGB"), &locator, &pixels).unwrap();

    assert_eq!(report.patches[1].verdict, Verdict::Fail);
    assert_eq!(report.evaluation.failed_patches(), vec![1]);
    assert!(!report.passed);
}

#[test]
fn test_rgb_run_requires_rgb_references() {
    let table = lab_target([0; 8]);
    let locator = placement(12, PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(lab_values(&table), ColorSpace::Rgb);
    let result = run(&table, &ToleranceSpec::default(), &Probe("'RGB'"), &locator, &pixels);
    assert!(matches!(result, Err(MeasureError::InvalidReference { .. })));
}

// ============================================================================
// Fatal Errors
// ============================================================================

#[test]
fn test_unsupported_color_space() {
    let table = lab_target([0; 8]);
    let locator = placement(12, PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(lab_values(&table), ColorSpace::Lab);

    match run(&table, &ToleranceSpec::default(), &Probe("'sRGB'"), &locator, &pixels) {
        Err(MeasureError::ColorSpaceUndetermined { label }) => assert_eq!(label, "'sRGB'"),
        other => panic!("Expected ColorSpaceUndetermined, got: {:?}", other),
    }
}

#[test]
fn test_locator_failure() {
    let table = lab_target([0; 8]);
    let pixels = UniformPixels::new(lab_values(&table), ColorSpace::Lab);

    match run(&table, &ToleranceSpec::default(), &Probe("'Lab'"), &LostTarget, &pixels) {
        Err(MeasureError::LocatorFailure { reason }) => {
            assert_eq!(reason, "no target match above threshold")
        }
        other => panic!("Expected LocatorFailure, got: {:?}", other),
    }
}

#[test]
fn test_sampling_failure_aborts_run() {
    let table = lab_target([0; 8]);
    let locator = placement(12, PixelPoint::new(300, 0));
    let mut pixels = UniformPixels::new(lab_values(&table), ColorSpace::Lab);
    pixels.fail_on = Some(5);

    let err = run(&table, &ToleranceSpec::default(), &Probe("'Lab'"), &locator, &pixels).unwrap_err();
    assert!(err.is_fatal());
    match err {
        MeasureError::SamplingUnavailable { patch, .. } => assert_eq!(patch, 5),
        other => panic!("Expected SamplingUnavailable, got: {:?}", other),
    }
}

#[test]
fn test_coincident_corners_are_degenerate() {
    let table = lab_target([0; 8]);
    let locator = placement(12, PixelPoint::new(0, 0));
    let pixels = UniformPixels::new(lab_values(&table), ColorSpace::Lab);

    let result = run(&table, &ToleranceSpec::default(), &Probe("'Lab'"), &locator, &pixels);
    assert!(matches!(result, Err(MeasureError::GeometryDegenerate { .. })));
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolution_from_corners() {
    let table = lab_target([0; 8]);
    let report = run_lab(&table, lab_values(&table));
    assert_eq!(report.resolution.target_length_px, 300.0);
    assert!((report.resolution.ppi - 76.2).abs() < 1e-9);
}

// ============================================================================
// JSON Files
// ============================================================================

#[test]
fn test_run_from_json_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("target.json");
    let tolerance_path = dir.path().join("tolerances.json");
    let report_path = dir.path().join("report.json");

    let table = lab_target([1, 2, 3, 4, 5, 6, 7, 8]);
    table.to_json_file(&table_path).unwrap();
    let mut tolerances = ToleranceSpec::default();
    tolerances.quality_level = Some("production".into());
    tolerances.to_json_file(&tolerance_path).unwrap();

    let table = ReferenceTable::from_json_file(&table_path).unwrap();
    let tolerances = ToleranceSpec::from_json_file(&tolerance_path).unwrap();
    let locator = placement(12, PixelPoint::new(300, 0));
    let pixels = UniformPixels::new(lab_values(&table), ColorSpace::Lab);
    let report = run(&table, &tolerances, &Probe("'Lab'"), &locator, &pixels).unwrap();
    assert_eq!(report.quality_level.as_deref(), Some("production"));

    report.to_json_file(&report_path).unwrap();
    let written = std::fs::read_to_string(&report_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["color_space"], "LAB");
    assert_eq!(value["stencil"], "5x5");
    assert_eq!(value["passed"], true);
    assert_eq!(value["patches"].as_array().map(Vec::len), Some(12));
}

#[test]
fn test_one_based_anchors_in_reference_file() {
    let json = r#"{
        "name": "two steps",
        "patches": [
            {"lab": {"l": 95.0, "a": 0.0, "b": 0.0}},
            {"lab": {"l": 90.0, "a": 0.0, "b": 0.0}}
        ],
        "partition": {"grayscale_first": true, "split": 0},
        "ramp": {"L95": 1, "L90": 2},
        "size": {"length_cm": 10.0, "width_cm": 4.0}
    }"#;
    let table: ReferenceTable = serde_json::from_str(json).unwrap();
    let report = run_lab(&table, lab_values(&table));

    assert_eq!(report.gain_modulation.len(), 1);
    assert_eq!(report.gain_modulation[0].pair, "L*95-L*90");
}
