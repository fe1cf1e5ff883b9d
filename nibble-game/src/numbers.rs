//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Scale `value` by an integer percentage and floor the result.
///
/// Computed in 64-bit integer space so `floor(25 × 1.10)` is exactly 27
/// with no binary floating point drift. Saturates at `u32::MAX`.
#[must_use]
pub fn scale_floor(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Convert an integer percentage into a display ratio (`110 -> 1.1`).
#[must_use]
pub fn percent_to_ratio(percent: u32) -> f64 {
    cast::<u32, f64>(percent).unwrap_or(0.0) / 100.0
}

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a u32 level into f64 for curve evaluation.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}
