//! File boundaries of a run: JSON inputs, JSON artifacts and the raster
//! header.
//!
//! - `load_controls`: control-point array, each entry validated with its index.
//! - `load_finds`: find-record array; non-object entries become empty records.
//! - `write_json_file` / `write_json_compact`: serialize a value to disk.
//! - `raster_dimensions`: width and height from an image header.

use crate::error::CalibError;
use crate::types::{ControlPoint, FindRecord};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn read_json_array(path: &Path, what: &str) -> Result<Vec<Value>, CalibError> {
    let source = || format!("{what} {}", path.display());
    let data = fs::read_to_string(path)
        .map_err(|e| CalibError::input(source(), format!("failed to read: {e}")))?;
    let value: Value = serde_json::from_str(&data)
        .map_err(|e| CalibError::input(source(), format!("failed to parse: {e}")))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CalibError::input(source(), "expected a JSON array")),
    }
}

/// Parse control points, naming the offending entry on failure.
pub fn parse_controls(items: Vec<Value>, source: &str) -> Result<Vec<ControlPoint>, CalibError> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let label = item
                .get("name")
                .and_then(Value::as_str)
                .map(|n| format!("control #{idx} ('{n}')"))
                .unwrap_or_else(|| format!("control #{idx}"));
            serde_json::from_value::<ControlPoint>(item)
                .map_err(|e| CalibError::input(source, format!("{label}: {e}")))
        })
        .collect()
}

pub fn load_controls(path: &Path) -> Result<Vec<ControlPoint>, CalibError> {
    let items = read_json_array(path, "controls")?;
    parse_controls(items, &format!("controls {}", path.display()))
}

pub fn parse_finds(items: Vec<Value>) -> Vec<FindRecord> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => FindRecord::from(map),
            other => {
                warn!("find #{idx} is not an object ({other}); it will be dropped");
                FindRecord::default()
            }
        })
        .collect()
}

pub fn load_finds(path: &Path) -> Result<Vec<FindRecord>, CalibError> {
    read_json_array(path, "finds").map(parse_finds)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CalibError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| output_err(path, e))?;
    write_bytes(path, json.as_bytes())
}

/// Serialize a value as compact JSON to `path`, creating parent directories.
pub fn write_json_compact<T: Serialize>(path: &Path, value: &T) -> Result<(), CalibError> {
    let json = serde_json::to_vec(value).map_err(|e| output_err(path, e))?;
    write_bytes(path, &json)
}

/// Width and height of the image at `path`, read from its header only.
pub fn raster_dimensions(path: &Path) -> Result<(u32, u32), CalibError> {
    image::image_dimensions(path).map_err(|e| CalibError::Raster {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CalibError> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes).map_err(|e| output_err(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<(), CalibError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| output_err(parent, e))?;
        }
    }
    Ok(())
}

fn output_err(path: &Path, e: impl ToString) -> CalibError {
    CalibError::Output {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
