use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Surveyed correspondence between a geographic location and a raster pixel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(rename = "x", alias = "px")]
    pub px: f64,
    #[serde(rename = "y", alias = "py")]
    pub py: f64,
}

impl ControlPoint {
    pub fn new(name: impl Into<String>, lon: f64, lat: f64, px: f64, py: f64) -> Self {
        Self {
            name: name.into(),
            lon,
            lat,
            px,
            py,
        }
    }

    pub fn pixel(&self) -> Vector2<f64> {
        Vector2::new(self.px, self.py)
    }
}

/// A control point after projection onto the Mercator plane.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedControlPoint {
    pub name: String,
    /// Planar (X, Y).
    pub plane: Vector2<f64>,
    /// Recorded pixel (px, py).
    pub pixel: Vector2<f64>,
}

/// `x = a·X + b·Y + c`, `y = d·X + e·Y + f`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    #[cfg(test)]
    pub(crate) fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 0.0,
        }
    }

    /// Map a planar point into pixel space.
    #[inline]
    pub fn apply(&self, plane: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.a * plane.x + self.b * plane.y + self.c,
            self.d * plane.x + self.e * plane.y + self.f,
        )
    }
}

/// Input find record: an open JSON object whose descriptive fields are
/// carried through to the output untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FindRecord(pub Map<String, Value>);

impl FindRecord {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// First candidate field holding a usable number, with the key it was
    /// found under.
    pub fn coordinate<'a>(&self, candidates: &'a [String]) -> Option<(&'a str, f64)> {
        candidates.iter().find_map(|key| {
            self.0
                .get(key.as_str())
                .and_then(value_as_f64)
                .map(|v| (key.as_str(), v))
        })
    }

    /// Precision stored under `field`: the raw value as recorded and its
    /// numeric reading for tier selection.
    pub fn precision(&self, field: &str) -> Option<(&Value, f64)> {
        let raw = self.0.get(field)?;
        value_as_f64(raw).map(|tier| (raw, tier))
    }
}

impl From<Map<String, Value>> for FindRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Output row: pass-through fields followed by precision and pixel position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Recorded precision, passed through as-is.
    pub precision: Value,
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }
}

/// Round half up to two decimals, matching `Math.round(v * 100) / 100`.
pub fn round2(v: f64) -> f64 {
    (v * 100.0 + 0.5).floor() / 100.0
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}
