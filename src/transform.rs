//! Placement of find records in raster pixel space.

use crate::config::FieldConfig;
use crate::error::ProjectionError;
use crate::jitter::jitter;
use crate::projection::project;
use crate::types::{round2, AffineTransform, FindRecord, PixelPoint};
use nalgebra::Vector2;
use rand::Rng;
use serde_json::Value;

/// Project `(lon, lat)` and map it through the fitted transform.
pub fn to_pixel(
    transform: &AffineTransform,
    lon: f64,
    lat: f64,
) -> Result<Vector2<f64>, ProjectionError> {
    Ok(transform.apply(project(lon, lat)?))
}

/// Outcome of placing a single find record.
#[derive(Debug)]
pub enum Placement {
    Placed(PixelPoint),
    /// Longitude or latitude absent or unusable.
    MissingCoordinates,
    Unprojectable(ProjectionError),
}

/// Place one record: project, transform, jitter by precision, round.
///
/// Geographic fields are stripped from the output; every other field is kept
/// in input order, followed by `precision`, `x` and `y`.
pub fn place_find<R: Rng>(
    record: &FindRecord,
    transform: &AffineTransform,
    fields: &FieldConfig,
    default_precision: i64,
    rng: &mut R,
) -> Placement {
    let (Some((_, lon)), Some((_, lat))) =
        (record.coordinate(&fields.lon), record.coordinate(&fields.lat))
    else {
        return Placement::MissingCoordinates;
    };
    let pixel = match to_pixel(transform, lon, lat) {
        Ok(p) => p,
        Err(e) => return Placement::Unprojectable(e),
    };

    let (precision, tier) = match record.precision(&fields.precision) {
        Some((raw, tier)) => (raw.clone(), tier),
        None => (Value::from(default_precision), default_precision as f64),
    };
    let (x, y) = jitter(rng, pixel.x, pixel.y, Some(tier));

    let mut out = record.fields().clone();
    for key in fields.lon.iter().chain(&fields.lat) {
        out.shift_remove(key);
    }
    for key in [fields.precision.as_str(), "precision", "x", "y"] {
        out.shift_remove(key);
    }
    if out.get("findIdentifier").map_or(true, Value::is_null) {
        let ident = match record.id() {
            Some(Value::String(s)) => format!("finds-{s}"),
            Some(Value::Null) | None => "finds-null".to_string(),
            Some(other) => format!("finds-{other}"),
        };
        out.insert("findIdentifier".to_string(), Value::String(ident));
    }

    Placement::Placed(PixelPoint {
        fields: out,
        precision,
        x: round2(x),
        y: round2(y),
    })
}
