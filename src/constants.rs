//! Encoding constants and defaults for target measurement
//!
//! This module contains compile-time constants for pixel decoding, rounding
//! precision, and tolerance defaults used when no quality level is supplied.

/// 8-bit LAB encoding as produced by the pixel extractor
pub mod lab_encoding {
    /// Scale from the 8-bit L* code (0-255) to lightness (0-100)
    pub const LIGHTNESS_SCALE: f64 = 100.0 / 255.0;

    /// a*/b* codes at or above this value are negative in two's complement
    pub const SIGNED_THRESHOLD: f64 = 128.0;

    /// Offset subtracted from a*/b* codes at or above [`SIGNED_THRESHOLD`]
    pub const SIGNED_OFFSET: f64 = 256.0;
}

/// Decimal places kept for each reported quantity
pub mod precision {
    /// Averaged channel values and noise
    pub const SAMPLE_DECIMALS: i32 = 1;

    /// Color differences, aggregates, gain modulation and resolution
    pub const METRIC_DECIMALS: i32 = 2;
}

/// Physical unit conversion
pub mod units {
    /// Centimeters per inch
    pub const CM_PER_INCH: f64 = 2.54;
}

/// Sampling defaults
pub mod sampling {
    /// Default side length of the square sample window, in pixels
    pub const DEFAULT_STENCIL: u32 = 5;
}

/// Baseline tolerances, used by [`crate::ToleranceSpec::default`]
pub mod tolerances {
    /// Maximum ΔE for a single patch
    pub const MAX_DELTA_E: f64 = 10.0;

    /// Maximum mean ΔE over the color patches
    pub const MEAN_DELTA_E: f64 = 4.0;

    /// Maximum ΔL for a grayscale patch
    pub const MAX_DELTA_L: f64 = 4.0;

    /// Maximum ΔC for a grayscale patch
    pub const MAX_DELTA_C: f64 = 4.0;

    /// Maximum single-channel RGB deviation
    pub const MAX_DEVIATION_RGB: f64 = 10.0;

    /// Accepted gain modulation band
    pub const GAIN_MIN: f64 = 0.7;
    pub const GAIN_MAX: f64 = 1.3;
}
