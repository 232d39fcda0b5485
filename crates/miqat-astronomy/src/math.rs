//! Angle normalisation helpers.

/// Wraps `value` into `[0, max)`.
#[inline]
pub fn normalize_to_scale(value: f64, max: f64) -> f64 {
    value - max * (value / max).floor()
}

/// Wraps an angle into `[0, 360)` degrees.
#[inline]
pub fn unwind_angle(angle: f64) -> f64 {
    normalize_to_scale(angle, 360.0)
}

/// Shifts an angle into `[-180, 180]` degrees.
#[inline]
pub fn quadrant_shift_angle(angle: f64) -> f64 {
    if (-180.0..=180.0).contains(&angle) {
        angle
    } else {
        angle - 360.0 * (angle / 360.0).round()
    }
}
