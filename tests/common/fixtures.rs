use findspot_calib::projection::project;
use findspot_calib::{AffineTransform, ControlPoint};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Plane-to-pixel map used to synthesise control points over England.
pub fn survey_transform() -> AffineTransform {
    AffineTransform {
        a: 15_000.0,
        b: 300.0,
        c: 1_950.0,
        d: -500.0,
        e: 21_000.0,
        f: 24_870.0,
    }
}

/// Control points whose pixels follow `survey_transform` exactly, each
/// pixel shifted by the matching entry of `noise`.
pub fn survey_controls(noise: &[(f64, f64)]) -> Vec<ControlPoint> {
    let sites = [
        ("Land's End", -5.71, 50.07),
        ("Dover", 1.31, 51.13),
        ("Berwick", -2.00, 55.77),
        ("Holyhead", -4.63, 53.31),
        ("Lowestoft", 1.75, 52.48),
        ("Carlisle", -2.93, 54.89),
        ("Southampton", -1.40, 50.91),
    ];
    let t = survey_transform();
    sites
        .iter()
        .enumerate()
        .map(|(i, &(name, lon, lat))| {
            let px = t.apply(project(lon, lat).expect("inland site"));
            let (nx, ny) = noise.get(i).copied().unwrap_or((0.0, 0.0));
            ControlPoint::new(name, lon, lat, px.x + nx, px.y + ny)
        })
        .collect()
}

pub fn controls_json(controls: &[ControlPoint]) -> Value {
    serde_json::to_value(controls).expect("controls serialize")
}

pub fn sample_finds() -> Value {
    json!([
        {
            "id": 101,
            "findIdentifier": "PAS-0001",
            "objecttype": "COIN",
            "broadperiod": "ROMAN",
            "fourFigureLat": 51.5,
            "fourFigureLon": -0.12,
            "precision": 10,
            "imageUrl": "https://example.org/101.jpg",
            "fromdate": 43,
            "todate": 410,
            "datefound1": "2019-04-02"
        },
        {
            "id": 102,
            "objecttype": "BROOCH",
            "broadperiod": "IRON AGE",
            "fourFigureLat": "52.2",
            "fourFigureLon": "0.12",
            "precision": 8
        },
        {
            "id": 103,
            "objecttype": "AXEHEAD",
            "broadperiod": "BRONZE AGE",
            "fourFigureLat": null,
            "fourFigureLon": -1.9
        },
        {
            "id": 104,
            "objecttype": "STRAP END",
            "broadperiod": "EARLY MEDIEVAL",
            "fourFigureLat": 53.96,
            "fourFigureLon": -1.08,
            "precision": 6
        },
        {
            "id": 105,
            "objecttype": "TOKEN",
            "broadperiod": "POST MEDIEVAL"
        },
        {
            "id": 106,
            "objecttype": "BUCKLE",
            "broadperiod": "MEDIEVAL",
            "fourFigureLat": 52.63,
            "fourFigureLon": 1.3
        }
    ])
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).expect("serialize")).expect("write");
    path
}
