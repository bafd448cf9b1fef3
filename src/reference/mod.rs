//! Reference data for a calibration target
//!
//! This module holds the immutable description of a target: reference
//! colors per patch, the grayscale/color partition, tonal-ramp anchors and
//! the physical size. It is loaded once per run and never mutated.

pub mod partition;
pub mod ramp;
pub mod table;

pub use partition::Partition;
pub use ramp::{RampAnchors, RampStep};
pub use table::{LabColor, ReferencePatch, ReferenceTable, RgbColor, TargetSize};
