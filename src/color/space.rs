//! Run-wide color space classification

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::{CollaboratorError, MeasureError, Result};

/// External collaborator that reports the colorspace name of the image
/// under test, e.g. `'Lab'`.
pub trait ColorSpaceProbe {
    fn colorspace_label(&self) -> std::result::Result<String, CollaboratorError>;
}

/// A label captured ahead of time answers for the image it came from.
impl ColorSpaceProbe for String {
    fn colorspace_label(&self) -> std::result::Result<String, CollaboratorError> {
        Ok(self.clone())
    }
}

/// Color space of the image under test.
///
/// Decided once per run from the color-space probe and never changed
/// afterwards. It selects the reference channel set and the metrics that
/// are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Perceptual CIE L*a*b*
    #[serde(rename = "LAB")]
    Lab,
    /// Device RGB
    #[serde(rename = "RGB")]
    Rgb,
}

impl ColorSpace {
    /// Classify the label reported by the color-space probe.
    ///
    /// The probe answers with the image's colorspace name, optionally wrapped
    /// in single quotes. Only `Lab` and `RGB` are measurable; anything else
    /// (including `sRGB` and `Gray`) fails the run.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ColorSpaceUndetermined`] for any other label
    pub fn classify(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        let bare = trimmed
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(trimmed);

        match bare {
            "Lab" => Ok(ColorSpace::Lab),
            "RGB" => Ok(ColorSpace::Rgb),
            _ => Err(MeasureError::ColorSpaceUndetermined {
                label: label.to_string(),
            }),
        }
    }

    /// Ask `probe` for the image's colorspace and classify the answer.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ColorSpaceUndetermined`] if the probe fails
    /// (with an empty label) or reports an unsupported colorspace
    pub fn detect(probe: &dyn ColorSpaceProbe) -> Result<Self> {
        let label = probe.colorspace_label().map_err(|e| {
            warn!(error = %e, "Color space probe failed");
            MeasureError::ColorSpaceUndetermined {
                label: String::new(),
            }
        })?;
        let color_space = Self::classify(&label)?;
        info!(%color_space, "Color space classified");
        Ok(color_space)
    }

    /// Classification string used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSpace::Lab => "LAB",
            ColorSpace::Rgb => "RGB",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
