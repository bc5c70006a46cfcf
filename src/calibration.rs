//! Control-point calibration: projection of the surveyed points, the affine
//! fit, and the residual report used by operators to spot survey mistakes.

use crate::affine::{fit_affine, MIN_CONTROL_POINTS};
use crate::error::CalibError;
use crate::projection::project;
use crate::types::{AffineTransform, ControlPoint, ProjectedControlPoint};
use log::info;
use serde::{Deserialize, Serialize};

/// Residual of one control point after the fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResidual {
    pub name: String,
    /// Euclidean pixel distance between reconstruction and recorded pixel.
    pub error: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationReport {
    pub per_point: Vec<ControlResidual>,
    pub mean_error: f64,
    pub max_error: f64,
}

impl CalibrationReport {
    pub fn print_text_summary(&self) {
        println!("--- Calibration quality ---");
        for r in &self.per_point {
            println!("  {}: {:.2} px", r.name, r.error);
        }
        println!("  Average error: {:.2} px", self.mean_error);
        println!("  Max error: {:.2} px", self.max_error);
    }
}

/// Residuals of `transform` against the control points it was fit to.
pub fn report(
    transform: &AffineTransform,
    projected: &[ProjectedControlPoint],
) -> CalibrationReport {
    let per_point: Vec<ControlResidual> = projected
        .iter()
        .map(|p| ControlResidual {
            name: p.name.clone(),
            error: (transform.apply(p.plane) - p.pixel).norm(),
        })
        .collect();
    if per_point.is_empty() {
        return CalibrationReport::default();
    }
    let mean_error = per_point.iter().map(|r| r.error).sum::<f64>() / per_point.len() as f64;
    let max_error = per_point.iter().map(|r| r.error).fold(0.0f64, f64::max);
    CalibrationReport {
        per_point,
        mean_error,
        max_error,
    }
}

/// Project every control point; any failure is fatal and names the point.
pub fn project_controls(
    controls: &[ControlPoint],
) -> Result<Vec<ProjectedControlPoint>, CalibError> {
    controls
        .iter()
        .map(|c| {
            let plane = project(c.lon, c.lat).map_err(|source| CalibError::ControlProjection {
                name: c.name.clone(),
                source,
            })?;
            Ok(ProjectedControlPoint {
                name: c.name.clone(),
                plane,
                pixel: c.pixel(),
            })
        })
        .collect()
}

/// Immutable result of calibrating one run: fit once, then shared read-only
/// by every point transformation.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub transform: AffineTransform,
    pub projected: Vec<ProjectedControlPoint>,
    pub report: CalibrationReport,
}

impl Calibration {
    pub fn fit(controls: &[ControlPoint]) -> Result<Self, CalibError> {
        if controls.len() < MIN_CONTROL_POINTS {
            return Err(CalibError::InsufficientControlPoints {
                found: controls.len(),
            });
        }
        let projected = project_controls(controls)?;
        let transform = fit_affine(&projected)?;
        let report = report(&transform, &projected);
        info!(
            "calibrated {} control points: mean error {:.2} px, max error {:.2} px",
            projected.len(),
            report.mean_error,
            report.max_error
        );
        Ok(Self {
            transform,
            projected,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn report_measures_euclidean_distance() {
        let projected = vec![
            ProjectedControlPoint {
                name: "a".into(),
                plane: Vector2::new(0.0, 0.0),
                pixel: Vector2::new(3.0, 4.0),
            },
            ProjectedControlPoint {
                name: "b".into(),
                plane: Vector2::new(1.0, 1.0),
                pixel: Vector2::new(1.0, 1.0),
            },
        ];
        let r = report(&AffineTransform::identity(), &projected);
        assert_eq!(r.per_point.len(), 2);
        assert_eq!(r.per_point[0].name, "a");
        assert_relative_eq!(r.per_point[0].error, 5.0);
        assert_relative_eq!(r.per_point[1].error, 0.0);
        assert_relative_eq!(r.mean_error, 2.5);
        assert_relative_eq!(r.max_error, 5.0);
    }

    #[test]
    fn empty_report_is_zero() {
        let r = report(&AffineTransform::identity(), &[]);
        assert!(r.per_point.is_empty());
        assert_eq!(r.mean_error, 0.0);
        assert_eq!(r.max_error, 0.0);
    }

    #[test]
    fn control_at_pole_names_the_point() {
        let controls = vec![
            ControlPoint::new("origin", 0.0, 0.0, 0.0, 0.0),
            ControlPoint::new("north pole", 0.0, 90.0, 0.0, 0.0),
            ControlPoint::new("east", 1.0, 0.0, 0.0, 0.0),
        ];
        match Calibration::fit(&controls) {
            Err(CalibError::ControlProjection { name, .. }) => assert_eq!(name, "north pole"),
            other => panic!("expected ControlProjection, got {other:?}"),
        }
    }

    #[test]
    fn exact_fit_has_zero_residual() {
        let controls = vec![
            ControlPoint::new("sw", -2.0, 51.0, 100.0, 900.0),
            ControlPoint::new("se", 1.0, 51.5, 800.0, 850.0),
            ControlPoint::new("n", -0.5, 54.0, 450.0, 100.0),
        ];
        let cal = Calibration::fit(&controls).unwrap();
        assert!(cal.report.max_error < 1e-6, "max={}", cal.report.max_error);
    }
}
