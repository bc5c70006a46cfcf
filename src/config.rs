use crate::error::CalibError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Stage size of the portrait map the points are rendered on.
pub const DEFAULT_RASTER_WIDTH: u32 = 2160;
pub const DEFAULT_RASTER_HEIGHT: u32 = 3840;

/// Precision assumed for finds that do not record one.
pub const DEFAULT_PRECISION: i64 = 10;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub points_json: PathBuf,
    /// Optional run report (calibration, counts, timings).
    pub report_json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            points_json: PathBuf::from("points_pixels.json"),
            report_json: None,
        }
    }
}

/// Names of the find-record fields read by the pipeline. Longitude and
/// latitude are looked up in order; the first usable value wins.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    pub lon: Vec<String>,
    pub lat: Vec<String>,
    pub precision: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            lon: vec!["fourFigureLon".into(), "lon".into(), "longitude".into()],
            lat: vec!["fourFigureLat".into(), "lat".into(), "latitude".into()],
            precision: "precision".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    /// When set, width and height are read from this image's header.
    pub image: Option<PathBuf>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_RASTER_WIDTH,
            height: DEFAULT_RASTER_HEIGHT,
            image: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub controls: PathBuf,
    pub finds: PathBuf,
    pub output: OutputConfig,
    pub fields: FieldConfig,
    pub default_precision: i64,
    pub raster: RasterConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            controls: PathBuf::from("controls.json"),
            finds: PathBuf::from("finds.json"),
            output: OutputConfig::default(),
            fields: FieldConfig::default(),
            default_precision: DEFAULT_PRECISION,
            raster: RasterConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Resolve every relative path against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.controls);
        join(&mut self.finds);
        join(&mut self.output.points_json);
        if let Some(p) = self.output.report_json.as_mut() {
            join(p);
        }
        if let Some(p) = self.raster.image.as_mut() {
            join(p);
        }
        self
    }
}

/// Load a JSON runtime config; relative paths are taken from the config's
/// directory.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, CalibError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CalibError::input(
            format!("config {}", path.display()),
            format!("failed to read: {e}"),
        )
    })?;
    let config: RuntimeConfig = serde_json::from_str(&contents).map_err(|e| {
        CalibError::input(
            format!("config {}", path.display()),
            format!("failed to parse: {e}"),
        )
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base))
}
