//! Least-squares affine fit from the projected plane to raster pixels.
//!
//! Pixel-x and pixel-y are solved as two independent linear regressions over
//! the same design rows `[X_i, Y_i, 1]`. The 3x3 normal matrix `AᵗA` is
//! inverted in closed form (adjugate over determinant), so the solve is a
//! single deterministic pass with no pivoting.

use crate::error::CalibError;
use crate::types::{AffineTransform, ProjectedControlPoint};
use log::debug;
use nalgebra::{Matrix3, Vector2, Vector3};

/// Determinants of `AᵗA` below this magnitude are treated as singular.
pub const SINGULAR_EPS: f64 = 1e-15;

/// Minimum number of correspondences for a determined fit.
pub const MIN_CONTROL_POINTS: usize = 3;

/// Fit `x = a·X + b·Y + c`, `y = d·X + e·Y + f` to the correspondences.
///
/// Exactly three non-collinear points are reproduced exactly; more points
/// yield the minimiser of the summed squared pixel residual.
pub fn fit_affine(points: &[ProjectedControlPoint]) -> Result<AffineTransform, CalibError> {
    if points.len() < MIN_CONTROL_POINTS {
        return Err(CalibError::InsufficientControlPoints {
            found: points.len(),
        });
    }

    let mut accum = NormalEquationAccum::default();
    for p in points {
        accum.accumulate(p.plane, p.pixel);
    }

    let inv = invert3x3(&accum.ata)?;
    let abc = inv * accum.atx;
    let def = inv * accum.aty;
    let transform = AffineTransform {
        a: abc[0],
        b: abc[1],
        c: abc[2],
        d: def[0],
        e: def[1],
        f: def[2],
    };
    debug!(
        "fit_affine: n={} a={:.6} b={:.6} c={:.6} d={:.6} e={:.6} f={:.6}",
        points.len(),
        transform.a,
        transform.b,
        transform.c,
        transform.d,
        transform.e,
        transform.f
    );
    Ok(transform)
}

/// Running sums of `AᵗA`, `Aᵗx` and `Aᵗy` for rows `[X, Y, 1]`.
struct NormalEquationAccum {
    ata: Matrix3<f64>,
    atx: Vector3<f64>,
    aty: Vector3<f64>,
}

impl Default for NormalEquationAccum {
    fn default() -> Self {
        Self {
            ata: Matrix3::zeros(),
            atx: Vector3::zeros(),
            aty: Vector3::zeros(),
        }
    }
}

impl NormalEquationAccum {
    fn accumulate(&mut self, plane: Vector2<f64>, pixel: Vector2<f64>) {
        let row = Vector3::new(plane.x, plane.y, 1.0);
        self.ata += row * row.transpose();
        self.atx += row * pixel.x;
        self.aty += row * pixel.y;
    }
}

/// Closed-form inverse of a 3x3 matrix via its adjugate.
pub fn invert3x3(m: &Matrix3<f64>) -> Result<Matrix3<f64>, CalibError> {
    let (a00, a01, a02) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (a10, a11, a12) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (a20, a21, a22) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    let det = a00 * (a11 * a22 - a12 * a21) - a01 * (a10 * a22 - a12 * a20)
        + a02 * (a10 * a21 - a11 * a20);
    if !det.is_finite() || det.abs() < SINGULAR_EPS {
        return Err(CalibError::SingularFit { determinant: det });
    }

    let adj = Matrix3::new(
        a11 * a22 - a12 * a21,
        a02 * a21 - a01 * a22,
        a01 * a12 - a02 * a11,
        a12 * a20 - a10 * a22,
        a00 * a22 - a02 * a20,
        a02 * a10 - a00 * a12,
        a10 * a21 - a11 * a20,
        a01 * a20 - a00 * a21,
        a00 * a11 - a01 * a10,
    );
    Ok(adj / det)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pcp(name: &str, x: f64, y: f64, px: f64, py: f64) -> ProjectedControlPoint {
        ProjectedControlPoint {
            name: name.to_string(),
            plane: Vector2::new(x, y),
            pixel: Vector2::new(px, py),
        }
    }

    #[test]
    fn three_points_recover_known_transform() {
        let truth = AffineTransform {
            a: 120.0,
            b: -15.0,
            c: 400.0,
            d: 10.0,
            e: 95.0,
            f: 250.0,
        };
        let planes = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.2),
            Vector2::new(-0.3, 1.0),
        ];
        let points: Vec<_> = planes
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let q = truth.apply(p);
                pcp(&format!("p{i}"), p.x, p.y, q.x, q.y)
            })
            .collect();

        let fitted = fit_affine(&points).unwrap();
        assert_relative_eq!(fitted.a, truth.a, epsilon = 1e-9);
        assert_relative_eq!(fitted.b, truth.b, epsilon = 1e-9);
        assert_relative_eq!(fitted.c, truth.c, epsilon = 1e-9);
        assert_relative_eq!(fitted.d, truth.d, epsilon = 1e-9);
        assert_relative_eq!(fitted.e, truth.e, epsilon = 1e-9);
        assert_relative_eq!(fitted.f, truth.f, epsilon = 1e-9);
    }

    #[test]
    fn least_squares_centres_symmetric_noise() {
        // Four corners of a unit square, pixel = 100 * plane, with +/-1 px
        // noise on x arranged so the best fit is the noiseless map.
        let points = vec![
            pcp("a", 0.0, 0.0, 1.0, 0.0),
            pcp("b", 1.0, 0.0, 99.0, 0.0),
            pcp("c", 1.0, 1.0, 101.0, 100.0),
            pcp("d", 0.0, 1.0, -1.0, 100.0),
        ];
        let t = fit_affine(&points).unwrap();
        assert_relative_eq!(t.a, 100.0, epsilon = 1e-9);
        assert_relative_eq!(t.b, 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.c, 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.e, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points_are_singular() {
        let points = vec![
            pcp("a", 0.0, 0.0, 0.0, 0.0),
            pcp("b", 1.0, 1.0, 10.0, 10.0),
            pcp("c", 2.0, 2.0, 20.0, 20.0),
        ];
        match fit_affine(&points) {
            Err(CalibError::SingularFit { determinant }) => {
                assert!(determinant.abs() < SINGULAR_EPS)
            }
            other => panic!("expected SingularFit, got {other:?}"),
        }
    }

    #[test]
    fn duplicated_points_are_singular() {
        let points = vec![
            pcp("a", 0.5, 0.5, 0.0, 0.0),
            pcp("b", 0.5, 0.5, 0.0, 0.0),
            pcp("c", 0.5, 0.5, 0.0, 0.0),
        ];
        assert!(matches!(
            fit_affine(&points),
            Err(CalibError::SingularFit { .. })
        ));
    }

    #[test]
    fn two_points_are_insufficient() {
        let points = vec![pcp("a", 0.0, 0.0, 0.0, 0.0), pcp("b", 1.0, 0.0, 1.0, 0.0)];
        assert!(matches!(
            fit_affine(&points),
            Err(CalibError::InsufficientControlPoints { found: 2 })
        ));
    }

    #[test]
    fn invert3x3_matches_identity_product() {
        let m = Matrix3::new(4.0, 7.0, 2.0, 3.0, 6.0, 1.0, 2.0, 5.0, 3.0);
        let inv = invert3x3(&m).unwrap();
        let prod = m * inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }
}
