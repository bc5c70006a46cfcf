//! Run diagnostics: calibration quality, record accounting, raster bounds and
//! stage timings. Reported to the operator; never fed back into the fit.

pub mod run;
pub mod timing;

pub use run::{RasterCheck, RecordCounts, RunReport};
pub use timing::{StageTiming, TimingBreakdown};
