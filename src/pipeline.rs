//! Conversion driver: load → fit → report → place → write.
//!
//! [`convert`] is the in-memory core; [`run`] wraps it with file I/O. Any
//! fatal error returns before the output artifact is written, so a failed run
//! never leaves a partial file behind.

use crate::calibration::Calibration;
use crate::config::{FieldConfig, RuntimeConfig, DEFAULT_PRECISION};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{RasterCheck, RecordCounts, RunReport, TimingBreakdown};
use crate::error::CalibError;
use crate::io;
use crate::transform::{place_find, Placement};
use crate::types::{ControlPoint, FindRecord, PixelPoint};
use log::{debug, info, warn};
use rand::Rng;
use std::time::Instant;

/// Find-record interpretation used by [`convert`].
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub fields: FieldConfig,
    pub default_precision: i64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fields: FieldConfig::default(),
            default_precision: DEFAULT_PRECISION,
        }
    }
}

impl From<&RuntimeConfig> for ConvertOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            fields: config.fields.clone(),
            default_precision: config.default_precision,
        }
    }
}

/// Output of an in-memory conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub calibration: Calibration,
    pub points: Vec<PixelPoint>,
    pub counts: RecordCounts,
}

impl Conversion {
    pub fn raster_check(&self, width: u32, height: u32) -> RasterCheck {
        let mut check = RasterCheck {
            width,
            height,
            ..Default::default()
        };
        check.controls_outside = self
            .calibration
            .projected
            .iter()
            .filter(|p| !check.contains(p.pixel.x, p.pixel.y))
            .count();
        check.points_outside = self
            .points
            .iter()
            .filter(|p| !check.contains(p.x, p.y))
            .count();
        check
    }
}

/// Fit the transform once from `controls`, then place every find with it.
///
/// Finds without usable coordinates, or whose coordinates cannot be
/// projected, are dropped and counted; everything else is fatal.
pub fn convert<R: Rng>(
    controls: &[ControlPoint],
    finds: &[FindRecord],
    options: &ConvertOptions,
    rng: &mut R,
) -> Result<Conversion, CalibError> {
    let calibration = Calibration::fit(controls)?;
    let (points, counts) = place_all(&calibration, finds, options, rng);
    Ok(Conversion {
        calibration,
        points,
        counts,
    })
}

fn place_all<R: Rng>(
    calibration: &Calibration,
    finds: &[FindRecord],
    options: &ConvertOptions,
    rng: &mut R,
) -> (Vec<PixelPoint>, RecordCounts) {
    let mut counts = RecordCounts {
        total: finds.len(),
        ..Default::default()
    };
    let mut points = Vec::with_capacity(finds.len());
    for (idx, find) in finds.iter().enumerate() {
        match place_find(
            find,
            &calibration.transform,
            &options.fields,
            options.default_precision,
            rng,
        ) {
            Placement::Placed(p) => points.push(p),
            Placement::MissingCoordinates => counts.missing_coordinates += 1,
            Placement::Unprojectable(e) => {
                debug!("dropping find #{idx} (id={:?}): {e}", find.id());
                counts.unprojectable += 1;
            }
        }
    }
    counts.placed = points.len();
    (points, counts)
}

/// Run a file-to-file conversion with an unseeded generator.
pub fn run(config: &RuntimeConfig) -> Result<RunReport, CalibError> {
    run_with_rng(config, &mut rand::rng())
}

pub fn run_with_rng<R: Rng>(config: &RuntimeConfig, rng: &mut R) -> Result<RunReport, CalibError> {
    let t0 = Instant::now();
    let mut timing = TimingBreakdown::default();

    let (controls, finds, (width, height)) = timing.time("load", || {
        let controls = io::load_controls(&config.controls)?;
        let finds = io::load_finds(&config.finds)?;
        let dims = match &config.raster.image {
            Some(path) => io::raster_dimensions(path)?,
            None => (config.raster.width, config.raster.height),
        };
        Ok::<_, CalibError>((controls, finds, dims))
    })?;
    info!(
        "loaded {} control points from {} and {} finds from {}",
        controls.len(),
        config.controls.display(),
        finds.len(),
        config.finds.display()
    );

    let options = ConvertOptions::from(config);
    let calibration = timing.time("fit", || Calibration::fit(&controls))?;
    let (points, counts) =
        timing.time("transform", || place_all(&calibration, &finds, &options, rng));
    let conversion = Conversion {
        calibration,
        points,
        counts,
    };

    let raster = conversion.raster_check(width, height);
    if raster.controls_outside > 0 {
        warn!(
            "{} control point(s) lie outside the {}x{} raster",
            raster.controls_outside, width, height
        );
    }
    if raster.points_outside > 0 {
        warn!(
            "{} placed point(s) lie outside the {}x{} raster",
            raster.points_outside, width, height
        );
    }

    timing.time("write", || {
        io::write_json_compact(&config.output.points_json, &conversion.points)
    })?;
    info!(
        "wrote {} points to {} ({} dropped)",
        counts.placed,
        config.output.points_json.display(),
        counts.dropped()
    );
    timing.total_ms = elapsed_ms(t0);

    let report = RunReport {
        transform: conversion.calibration.transform,
        calibration: conversion.calibration.report,
        counts,
        raster,
        timing,
    };
    if let Some(path) = &config.output.report_json {
        io::write_json_file(path, &report)?;
        info!("wrote run report to {}", path.display());
    }
    Ok(report)
}
