#![doc = include_str!("../README.md")]

// Core numerics
pub mod affine;
pub mod calibration;
pub mod jitter;
pub mod projection;
pub mod transform;
pub mod types;

// Driver and boundaries
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod pipeline;

// --- High-level re-exports -------------------------------------------------

pub use crate::calibration::{Calibration, CalibrationReport};
pub use crate::config::{load_config, RuntimeConfig};
pub use crate::diagnostics::RunReport;
pub use crate::error::{CalibError, ProjectionError};
pub use crate::pipeline::{convert, run, ConvertOptions, Conversion};
pub use crate::types::{AffineTransform, ControlPoint, FindRecord, PixelPoint};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for in-memory conversions.
///
/// ```no_run
/// use findspot_calib::prelude::*;
///
/// # fn main() -> Result<(), CalibError> {
/// let controls = vec![
///     ControlPoint::new("a", 0.0, 0.0, 100.0, 100.0),
///     ControlPoint::new("b", 1.0, 0.0, 200.0, 100.0),
///     ControlPoint::new("c", 0.0, 1.0, 100.0, 0.0),
/// ];
/// let finds: Vec<FindRecord> = serde_json::from_str(r#"[{"id": 1, "lon": 0.5, "lat": 0.5}]"#)
///     .expect("valid JSON");
///
/// let out = convert(&controls, &finds, &ConvertOptions::default(), &mut rand::rng())?;
/// println!("placed={} mean_error={:.2}", out.counts.placed, out.calibration.report.mean_error);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::pipeline::{convert, ConvertOptions};
    pub use crate::{CalibError, ControlPoint, FindRecord, PixelPoint};
}
