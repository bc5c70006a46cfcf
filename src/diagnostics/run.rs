use super::TimingBreakdown;
use crate::calibration::CalibrationReport;
use crate::types::AffineTransform;
use serde::{Deserialize, Serialize};

/// What happened to the input find records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    pub total: usize,
    pub placed: usize,
    pub missing_coordinates: usize,
    pub unprojectable: usize,
}

impl RecordCounts {
    pub fn dropped(&self) -> usize {
        self.missing_coordinates + self.unprojectable
    }
}

/// Points falling outside the target raster. They are kept in the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterCheck {
    pub width: u32,
    pub height: u32,
    pub controls_outside: usize,
    pub points_outside: usize,
}

impl RasterCheck {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64
    }
}

/// Summary of one conversion run, optionally written next to the artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub transform: AffineTransform,
    pub calibration: CalibrationReport,
    pub counts: RecordCounts,
    pub raster: RasterCheck,
    pub timing: TimingBreakdown,
}

impl RunReport {
    pub fn print_text_summary(&self) {
        let t = &self.transform;
        println!("Affine parameters");
        println!(
            "  a={:.6} b={:.6} c={:.6}\n  d={:.6} e={:.6} f={:.6}",
            t.a, t.b, t.c, t.d, t.e, t.f
        );
        println!();
        self.calibration.print_text_summary();
        println!();
        let c = &self.counts;
        println!(
            "Finds: total={} placed={} missing_coords={} unprojectable={}",
            c.total, c.placed, c.missing_coordinates, c.unprojectable
        );
        let r = &self.raster;
        println!(
            "Raster {}x{}: controls_outside={} points_outside={}",
            r.width, r.height, r.controls_outside, r.points_outside
        );
        let stages: Vec<String> = self
            .timing
            .stages
            .iter()
            .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
            .collect();
        println!(
            "Timings (ms): {} total={:.3}",
            stages.join(" "),
            self.timing.total_ms
        );
    }
}
