//! Error taxonomy for a conversion run.
//!
//! Every variant except [`ProjectionError`] on a single find record aborts the
//! run before the output artifact is written.

use std::path::PathBuf;
use thiserror::Error;

/// A coordinate that the Mercator projection cannot represent.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("cannot project (lon={lon}, lat={lat}): {reason}")]
pub struct ProjectionError {
    pub lon: f64,
    pub lat: f64,
    pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum CalibError {
    /// Missing, unreadable or malformed input (controls, finds or config).
    #[error("invalid input {source_name}: {reason}")]
    Input { source_name: String, reason: String },

    #[error("need at least 3 control points, got {found}")]
    InsufficientControlPoints { found: usize },

    #[error("control point '{name}' is outside the projection")]
    ControlProjection {
        name: String,
        #[source]
        source: ProjectionError,
    },

    /// The normal-equations matrix is numerically singular; typically the
    /// control points are collinear.
    #[error("singular matrix in affine solve (det={determinant:e}); control points may be collinear")]
    SingularFit { determinant: f64 },

    #[error("failed to write {}: {reason}", .path.display())]
    Output { path: PathBuf, reason: String },

    #[error("failed to read raster {}: {reason}", .path.display())]
    Raster { path: PathBuf, reason: String },
}

impl CalibError {
    pub(crate) fn input(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Input {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
