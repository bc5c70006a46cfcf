//! Precision-dependent obfuscation of placed points.
//!
//! Offsets are uniform and independent per axis (a square envelope). The
//! generator is a parameter; production callers pass an unseeded
//! `rand::rng()` so placements are not reproducible between runs.

use rand::Rng;

/// Radius (px) for missing precision and for precision >= 10.
pub const FINE_RADIUS_PX: f64 = 2.0;
/// Radius (px) for precision in [8, 10).
pub const MEDIUM_RADIUS_PX: f64 = 6.0;
/// Radius (px) for precision below 8.
pub const COARSE_RADIUS_PX: f64 = 10.0;

/// Jitter bound for a precision tier. Missing precision is treated like the
/// finest tier; fractional values fall into the tier their value reaches.
pub fn jitter_radius(precision: Option<f64>) -> f64 {
    match precision {
        None => FINE_RADIUS_PX,
        Some(p) if p >= 10.0 => FINE_RADIUS_PX,
        Some(p) if p >= 8.0 => MEDIUM_RADIUS_PX,
        Some(_) => COARSE_RADIUS_PX,
    }
}

/// Displace `(x, y)` by independent uniform offsets in `[-r, r]`.
pub fn jitter<R: Rng>(rng: &mut R, x: f64, y: f64, precision: Option<f64>) -> (f64, f64) {
    let r = jitter_radius(precision);
    let dx = rng.random_range(-r..=r);
    let dy = rng.random_range(-r..=r);
    (x + dx, y + dy)
}
