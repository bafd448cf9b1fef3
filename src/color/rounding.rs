//! Decimal rounding used for every reported quantity
//!
//! Ties round toward positive infinity (`floor(x * 10^d + 0.5)`), so
//! `-2.25` becomes `-2.2` at one decimal. Reports from earlier tooling were
//! produced this way and stay comparable.

/// Round `value` to `decimals` decimal places, ties toward +∞.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale + 0.5).floor() / scale
}

/// Round to one decimal place (sample averages and noise)
pub fn round1(value: f64) -> f64 {
    round_to(value, crate::constants::precision::SAMPLE_DECIMALS)
}

/// Round to two decimal places (metrics)
pub fn round2(value: f64) -> f64 {
    round_to(value, crate::constants::precision::METRIC_DECIMALS)
}
