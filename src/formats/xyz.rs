//! Whitespace-separated XYZ scan exports.
//!
//! Each non-empty line holds one sample:
//!
//! ```text
//! x y z            # position only
//! x y z r g b      # position plus 8-bit color
//! ```
//!
//! Extra columns after the sixth (intensity, return number, ...) are ignored.
//! Lines starting with `#` are comments.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::collection::PointCollection;
use crate::error::FitError;
use crate::point::{ColoredPoint, Point3D, Rgb};

/// Parse one record. Returns `Ok(None)` for blank and comment lines.
pub fn parse_record(line: &str) -> Result<Option<ColoredPoint>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        bail!("expected at least 3 fields, got {}", fields.len());
    }

    let mut xyz = [0.0f64; 3];
    for (value, field) in xyz.iter_mut().zip(&fields[..3]) {
        *value = field
            .parse()
            .map_err(|_| FitError::invalid_coordinate(format!("'{field}' is not a number")))?;
    }
    let point = Point3D::try_from(xyz)?;

    let color = if fields.len() >= 6 {
        let mut rgb = [0u8; 3];
        for (value, field) in rgb.iter_mut().zip(&fields[3..6]) {
            *value = field
                .parse()
                .with_context(|| format!("color component '{field}' is not in 0..=255"))?;
        }
        Some(Rgb::new(rgb[0], rgb[1], rgb[2]))
    } else {
        None
    };

    Ok(Some(ColoredPoint::new(point, color)))
}

/// Load a scan from an in-memory string.
pub fn load_scan(name: &str, data: &str) -> Result<PointCollection<ColoredPoint>> {
    let mut scan = PointCollection::new(name);
    for (lineno, line) in data.lines().enumerate() {
        let record = parse_record(line).with_context(|| format!("line {}", lineno + 1))?;
        if let Some(point) = record {
            scan.push(point);
        }
    }
    Ok(scan)
}

/// Load a scan from a text file. The collection is named after the file stem.
pub fn load_scan_from_file<P: AsRef<Path>>(path: P) -> Result<PointCollection<ColoredPoint>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scan file {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    load_scan(&name, &data).with_context(|| format!("failed to parse {}", path.display()))
}
