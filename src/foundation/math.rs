/// Tolerance used to absorb floating-point noise at facet boundaries.
pub(crate) const BOUNDARY_EPS: f64 = 1e-9;

/// Snap values within [`BOUNDARY_EPS`] of `[0, 1]` onto the interval.
///
/// Values further outside are returned untouched so callers can still reject them.
pub(crate) fn snap_unit(v: f64) -> f64 {
    if v < 0.0 && v > -BOUNDARY_EPS {
        0.0
    } else if v > 1.0 && v < 1.0 + BOUNDARY_EPS {
        1.0
    } else {
        v
    }
}

/// Round and saturate a channel value into `u8`.
pub(crate) fn saturate_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Half-open interval test `[lo, hi)`.
pub(crate) fn in_interval(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo && v < hi
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
