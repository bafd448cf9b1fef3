//! Color metrics
//!
//! This module handles color space classification, perceptual color
//! differences (ΔE, ΔL, ΔC), RGB deviation statistics and display
//! previews of patch colors.

pub mod deviation;
pub mod difference;
pub mod preview;
pub mod rounding;
pub mod space;

pub use deviation::RgbMetrics;
pub use difference::{Aggregate, LabMetrics};
pub use space::{ColorSpace, ColorSpaceProbe};
