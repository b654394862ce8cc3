//! Waypoint YAML export and import.
//!
//! Exported documents look like:
//!
//! ```yaml
//! format_version: '1.0'
//! waypoints:
//! - number: 1
//!   x: 1.0
//!   y: 2.0
//!   angle_degrees: 90.0
//!   angle_radians: 1.5707963267948966
//! ```
//!
//! The fields and their types come from a [`FormatDescriptor`]. Import reads
//! `x`, `y`, and `angle_degrees` from each entry and skips entries that lack
//! them, reporting each skip.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Number, Value};
use tracing::warn;
use wayedit_core::{FormatDescriptor, MetricPoint, PixelPoint, Result, ScalarType, WaypointFileError};

use crate::transform::MapFrame;
use crate::waypoint::Waypoint;

/// Raw value of a waypoint field before type conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Field names the exporter knows how to produce.
pub const KNOWN_FIELDS: [&str; 8] = [
    "number",
    "name",
    "x",
    "y",
    "pixel_x",
    "pixel_y",
    "angle_degrees",
    "angle_radians",
];

pub fn extract_field(waypoint: &Waypoint, name: &str) -> Option<FieldValue> {
    let value = match name {
        "number" => FieldValue::Int(waypoint.number() as i64),
        "name" => FieldValue::Text(waypoint.name()),
        "x" => FieldValue::Float(waypoint.metric().x),
        "y" => FieldValue::Float(waypoint.metric().y),
        "pixel_x" => FieldValue::Int(waypoint.pixel().x as i64),
        "pixel_y" => FieldValue::Int(waypoint.pixel().y as i64),
        "angle_degrees" => FieldValue::Float(waypoint.angle_degrees()),
        "angle_radians" => FieldValue::Float(waypoint.angle()),
        _ => return None,
    };
    Some(value)
}

/// Converts a raw value to the requested scalar type.
///
/// `int` truncates toward zero, `bool` is "non-zero / non-empty".
pub fn convert(value: FieldValue, ty: ScalarType) -> Option<Value> {
    let converted = match (ty, value) {
        (ScalarType::Int, FieldValue::Int(i)) => Value::Number(i.into()),
        (ScalarType::Int, FieldValue::Float(f)) if f.is_finite() => {
            Value::Number((f.trunc() as i64).into())
        }
        (ScalarType::Int, FieldValue::Text(s)) => Value::Number(s.trim().parse::<i64>().ok()?.into()),
        (ScalarType::Float, FieldValue::Int(i)) => Value::Number(Number::from(i as f64)),
        (ScalarType::Float, FieldValue::Float(f)) => Value::Number(Number::from(f)),
        (ScalarType::Float, FieldValue::Text(s)) => {
            Value::Number(Number::from(s.trim().parse::<f64>().ok()?))
        }
        (ScalarType::Str, FieldValue::Int(i)) => Value::String(i.to_string()),
        (ScalarType::Str, FieldValue::Float(f)) => Value::String(f.to_string()),
        (ScalarType::Str, FieldValue::Text(s)) => Value::String(s),
        (ScalarType::Bool, FieldValue::Int(i)) => Value::Bool(i != 0),
        (ScalarType::Bool, FieldValue::Float(f)) => Value::Bool(f != 0.0),
        (ScalarType::Bool, FieldValue::Text(s)) => Value::Bool(!s.is_empty()),
        _ => return None,
    };
    Some(converted)
}

/// Builds the export document for `waypoints` in collection order.
pub fn export_document(waypoints: &[Waypoint], format: &FormatDescriptor) -> Value {
    for field in &format.fields {
        if !KNOWN_FIELDS.contains(&field.name.as_str()) {
            warn!("Skipping unknown waypoint field '{}' on export", field.name);
        }
    }

    let entries: Vec<Value> = waypoints
        .iter()
        .map(|w| {
            let mut entry = Mapping::new();
            for field in &format.fields {
                let Some(raw) = extract_field(w, &field.name) else {
                    continue;
                };
                match convert(raw, field.ty) {
                    Some(value) => {
                        entry.insert(Value::String(field.name.clone()), value);
                    }
                    None => warn!(
                        "Cannot convert field '{}' of waypoint {} to {}",
                        field.name,
                        w.number(),
                        field.ty
                    ),
                }
            }
            Value::Mapping(entry)
        })
        .collect();

    let mut root = Mapping::new();
    root.insert("format_version".into(), Value::String(format.version.clone()));
    root.insert("waypoints".into(), Value::Sequence(entries));
    Value::Mapping(root)
}

pub fn export_to_string(waypoints: &[Waypoint], format: &FormatDescriptor) -> Result<String> {
    serde_yaml::to_string(&export_document(waypoints, format))
        .map_err(|e| WaypointFileError::Parse(e.to_string()).into())
}

pub fn save_waypoints(
    path: impl AsRef<Path>,
    waypoints: &[Waypoint],
    format: &FormatDescriptor,
) -> Result<()> {
    fs::write(path, export_to_string(waypoints, format)?)?;
    Ok(())
}

/// A parsed waypoint document, before conversion to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointFile {
    pub format_version: Option<String>,
    pub entries: Vec<Value>,
}

/// The file's declared version differs from the active descriptor's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMismatch {
    pub file_version: String,
    pub expected: String,
}

/// One entry that import could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the `waypoints` list
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedEntry>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl WaypointFile {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let doc: Value =
            serde_yaml::from_str(text).map_err(|e| WaypointFileError::Parse(e.to_string()))?;
        let Value::Mapping(root) = doc else {
            return Err(WaypointFileError::MissingKey("waypoints".to_string()).into());
        };
        let entries = match root.get("waypoints") {
            Some(Value::Sequence(seq)) => seq.clone(),
            Some(Value::Null) => Vec::new(),
            Some(_) => {
                return Err(WaypointFileError::InvalidFormat(
                    "'waypoints' must be a list".to_string(),
                )
                .into())
            }
            None => return Err(WaypointFileError::MissingKey("waypoints".to_string()).into()),
        };
        Ok(Self {
            format_version: root.get("format_version").and_then(scalar_to_string),
            entries,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Only files that declare a version can mismatch.
    pub fn version_mismatch(&self, expected: &str) -> Option<VersionMismatch> {
        let file_version = self.format_version.as_ref()?;
        (file_version != expected).then(|| VersionMismatch {
            file_version: file_version.clone(),
            expected: expected.to_string(),
        })
    }

    /// Converts entries to pixel poses, collecting the ones that cannot be used.
    pub fn decode(&self, frame: &MapFrame) -> (Vec<(PixelPoint, f64)>, Vec<SkippedEntry>) {
        let mut poses = Vec::with_capacity(self.entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let decoded = decode_entry(entry).and_then(|(metric, degrees)| {
                frame
                    .try_to_pixel(metric)
                    .map(|pixel| (pixel, degrees))
                    .ok_or_else(|| "coordinate out of range".to_string())
            });
            match decoded {
                Ok((pixel, degrees)) => poses.push((pixel, degrees.to_radians())),
                Err(reason) => {
                    warn!("Skipping waypoint entry {}: {}", index, reason);
                    skipped.push(SkippedEntry { index, reason });
                }
            }
        }
        (poses, skipped)
    }
}

fn number_field(entry: &Mapping, key: &str) -> std::result::Result<f64, String> {
    match entry.get(key) {
        None => Err(format!("missing key '{}'", key)),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("key '{}' is not a number", key)),
    }
}

fn decode_entry(entry: &Value) -> std::result::Result<(MetricPoint, f64), String> {
    let Value::Mapping(entry) = entry else {
        return Err("entry is not a mapping".to_string());
    };
    let x = number_field(entry, "x")?;
    let y = number_field(entry, "y")?;
    let degrees = number_field(entry, "angle_degrees")?;
    Ok((MetricPoint::new(x, y), degrees))
}
