//! Configuration structures for scan_quality measurement runs.
//!
//! Two documents drive a run besides the reference table:
//!
//! - [`ToleranceSpec`]: pass/fail thresholds, loaded once and never mutated
//! - [`MeasureConfig`]: sampling and gain-modulation settings
//!
//! Both can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use scan_quality::{MeasureConfig, ToleranceSpec};
//! use std::path::Path;
//!
//! // Load from file
//! let tolerances = ToleranceSpec::from_json_file(Path::new("tolerances.json"))?;
//!
//! // Or use defaults
//! let config = MeasureConfig::default();
//! # Ok::<(), scan_quality::MeasureError>(())
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{sampling, tolerances};
use crate::gain::{GainSlot, SlopeMode};
use crate::{MeasureError, Result};

/// Pass/fail thresholds for one quality level.
///
/// Gain-modulation bounds are per slot; a slot without bounds gets no
/// verdict even when a reading exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSpec {
    /// Name of the quality level these thresholds describe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_level: Option<String>,

    /// Per-patch ΔE limit
    pub max_delta_e: f64,

    /// Limit for mean ΔE over the color patches
    pub mean_delta_e: f64,

    /// Per-patch ΔL limit over the grayscale patches
    pub max_delta_l: f64,

    /// Per-patch ΔC limit over the grayscale patches
    pub max_delta_c: f64,

    /// Per-patch limit for the largest RGB channel deviation
    pub max_deviation_rgb: f64,

    /// Accepted gain-modulation range per slot
    #[serde(default)]
    pub gain_modulation: BTreeMap<GainSlot, GainBounds>,
}

/// Inclusive gain-modulation range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainBounds {
    pub min: f64,
    pub max: f64,
}

impl GainBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for ToleranceSpec {
    fn default() -> Self {
        let bounds = GainBounds::new(tolerances::GAIN_MIN, tolerances::GAIN_MAX);
        Self {
            quality_level: None,
            max_delta_e: tolerances::MAX_DELTA_E,
            mean_delta_e: tolerances::MEAN_DELTA_E,
            max_delta_l: tolerances::MAX_DELTA_L,
            max_delta_c: tolerances::MAX_DELTA_C,
            max_deviation_rgb: tolerances::MAX_DEVIATION_RGB,
            gain_modulation: GainSlot::ALL.iter().map(|slot| (*slot, bounds)).collect(),
        }
    }
}

impl ToleranceSpec {
    /// Bounds for `slot`, if the tolerance set defines any
    pub fn gain_bounds(&self, slot: GainSlot) -> Option<GainBounds> {
        self.gain_modulation.get(&slot).copied()
    }

    /// Load tolerances from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Save tolerances to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "tolerances")
    }
}

/// Settings for one measurement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Side of the square sample window, in pixels
    #[serde(default = "default_stencil")]
    pub stencil: u32,

    /// Slope form used for gain modulation
    #[serde(default)]
    pub slope_mode: SlopeMode,
}

fn default_stencil() -> u32 {
    sampling::DEFAULT_STENCIL
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            stencil: default_stencil(),
            slope_mode: SlopeMode::default(),
        }
    }
}

impl MeasureConfig {
    /// Reject settings no run can use.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidParameter`] for a zero stencil
    pub fn validate(&self) -> Result<()> {
        if self.stencil == 0 {
            return Err(MeasureError::InvalidParameter {
                parameter: "stencil".into(),
                value: self.stencil.to_string(),
            });
        }
        Ok(())
    }

    /// Stencil as displayed in reports, e.g. `5x5`
    pub fn stencil_label(&self) -> String {
        format!("{}x{}", self.stencil, self.stencil)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        write_json(self, path, "measurement config")
    }
}

/// Read and parse any JSON input document
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MeasureError::config(format!("reading {}", path.display()), e))?;
    serde_json::from_str(&content)
        .map_err(|e| MeasureError::config(format!("parsing {}", path.display()), e))
}

/// Pretty-print any document to a JSON file
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MeasureError::config(format!("serializing {}", what), e))?;
    std::fs::write(path, json)
        .map_err(|e| MeasureError::config(format!("writing {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerances_cover_every_slot() {
        let spec = ToleranceSpec::default();
        for slot in GainSlot::ALL {
            let bounds = spec.gain_bounds(slot).unwrap();
            assert!(bounds.contains(1.0));
        }
        assert_eq!(spec.max_delta_e, 10.0);
    }

    #[test]
    fn test_gain_bounds_are_inclusive() {
        let bounds = GainBounds::new(0.8, 1.2);
        assert!(bounds.contains(0.8));
        assert!(bounds.contains(1.2));
        assert!(!bounds.contains(1.21));
        assert!(!bounds.contains(0.79));
    }

    #[test]
    fn test_tolerances_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tolerances.json");
        let mut spec = ToleranceSpec::default();
        spec.quality_level = Some("FADGI 4 star".into());
        spec.gain_modulation.remove(&GainSlot::Shadow);
        spec.to_json_file(&path).unwrap();

        let loaded = ToleranceSpec::from_json_file(&path).unwrap();
        assert_eq!(loaded, spec);
        assert!(loaded.gain_bounds(GainSlot::Shadow).is_none());
    }

    #[test]
    fn test_gain_slots_serialize_as_names() {
        let json = serde_json::to_string(&ToleranceSpec::default()).unwrap();
        assert!(json.contains("\"HighlightsHigh\""));
        assert!(!json.contains("quality_level"));
    }

    #[test]
    fn test_measure_config_defaults_fill_missing_fields() {
        let config: MeasureConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MeasureConfig::default());
        assert_eq!(config.stencil_label(), "5x5");

        let config: MeasureConfig = serde_json::from_str(r#"{"slope_mode":"Absolute"}"#).unwrap();
        assert_eq!(config.slope_mode, SlopeMode::Absolute);
        assert_eq!(config.stencil, 5);
    }

    #[test]
    fn test_zero_stencil_is_invalid() {
        let config = MeasureConfig {
            stencil: 0,
            ..MeasureConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MeasureError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = MeasureConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, MeasureError::ConfigError { .. }));
        assert!(err.to_string().contains("parsing"));
    }
}
