//! Spherical Mercator with unit scale and zero translation.
//!
//! The plane only has to preserve relative geometry: the affine fit absorbs
//! scale, rotation and offset to the target raster. Y follows screen
//! orientation (north up, Y grows southward).

use crate::error::ProjectionError;
use nalgebra::Vector2;
use std::f64::consts::{FRAC_PI_4, PI, TAU};

/// Latitudes closer than this (degrees) to a pole are rejected.
pub const POLE_EPSILON_DEG: f64 = 1e-9;

/// Project `(lon, lat)` in degrees onto the Mercator plane.
pub fn project(lon: f64, lat: f64) -> Result<Vector2<f64>, ProjectionError> {
    let fail = |reason| ProjectionError { lon, lat, reason };
    if !lon.is_finite() || !lat.is_finite() {
        return Err(fail("coordinate is not finite"));
    }
    if lat.abs() > 90.0 {
        return Err(fail("latitude out of range"));
    }
    if 90.0 - lat.abs() < POLE_EPSILON_DEG {
        return Err(fail("latitude too close to a pole"));
    }

    let lambda = wrap_longitude(lon.to_radians());
    let phi = lat.to_radians();
    let y = -(FRAC_PI_4 + phi * 0.5).tan().ln();
    if !y.is_finite() {
        return Err(fail("projected coordinate is not finite"));
    }
    Ok(Vector2::new(lambda, y))
}

/// Single-turn wrap into `[-π, π]`; inputs beyond one extra turn are only
/// shifted once, as d3's identity rotation does.
fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}
