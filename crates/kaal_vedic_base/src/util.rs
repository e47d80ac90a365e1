//! Shared numeric helpers.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Elapsed fraction of `[start, end)` at `at`, clamped to [0, 1].
///
/// A zero-length or inverted span reports 0.
pub fn elapsed_fraction(start: f64, end: f64, at: f64) -> f64 {
    let span = end - start;
    if span.is_nan() || span <= 0.0 || !at.is_finite() {
        return 0.0;
    }
    ((at - start) / span).clamp(0.0, 1.0)
}
