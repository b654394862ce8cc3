//! Conversion to and from the legacy `points` waypoint format.
//!
//! Legacy files store each pose as `[x, y, z, qx, qy, qz, qw]`, a position plus
//! an orientation quaternion about the z axis:
//!
//! ```yaml
//! points:
//! - [1.0, 2.0, 0.0, 0.0, 0.0, 0.7071, 0.7071]
//! ```

use serde_yaml::{Mapping, Number, Value};
use tracing::warn;
use wayedit_core::constants::WAYPOINT_FORMAT_VERSION;
use wayedit_core::{Result, WaypointFileError};

use crate::waypoint_io::WaypointFile;

/// Planar pose read from either format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose {
    /// `[x, y, 0, 0, 0, sin(yaw/2), cos(yaw/2)]`
    pub fn to_point(&self) -> [f64; 7] {
        let half = self.yaw / 2.0;
        [self.x, self.y, 0.0, 0.0, 0.0, half.sin(), half.cos()]
    }

    pub fn from_point(point: &[f64]) -> Option<Self> {
        let &[x, y, _z, _qx, _qy, qz, qw, ..] = point else {
            return None;
        };
        Some(Self {
            x,
            y,
            yaw: 2.0 * qz.atan2(qw),
        })
    }
}

fn float(v: f64) -> Value {
    Value::Number(Number::from(v))
}

fn pose_of_entry(entry: &Value) -> Option<Pose> {
    let x = entry.get("x")?.as_f64()?;
    let y = entry.get("y")?.as_f64()?;
    let yaw = match entry.get("angle_radians").and_then(Value::as_f64) {
        Some(r) => r,
        None => entry
            .get("angle_degrees")
            .and_then(Value::as_f64)
            .map(f64::to_radians)
            .unwrap_or(0.0),
    };
    Some(Pose { x, y, yaw })
}

/// Converts a current-format waypoint document to a legacy `points` document.
pub fn to_legacy(file: &WaypointFile) -> Value {
    let points: Vec<Value> = file
        .entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let pose = pose_of_entry(entry);
            if pose.is_none() {
                warn!("Waypoint entry {} has no x/y; not converted", i);
            }
            pose
        })
        .map(|pose| Value::Sequence(pose.to_point().into_iter().map(float).collect()))
        .collect();

    let mut root = Mapping::new();
    root.insert("points".into(), Value::Sequence(points));
    Value::Mapping(root)
}

/// Converts a legacy `points` document to a current-format waypoint document.
pub fn from_legacy(doc: &Value) -> Result<Value> {
    let Some(Value::Sequence(points)) = doc.get("points") else {
        return Err(WaypointFileError::MissingKey("points".to_string()).into());
    };

    let mut entries = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let values: Option<Vec<f64>> = point
            .as_sequence()
            .and_then(|seq| seq.iter().map(Value::as_f64).collect());
        let Some(pose) = values.as_deref().and_then(Pose::from_point) else {
            warn!("Legacy point {} is not a 7-element pose; skipped", i);
            continue;
        };

        let mut entry = Mapping::new();
        entry.insert("number".into(), Value::Number((entries.len() as i64 + 1).into()));
        entry.insert("x".into(), float(pose.x));
        entry.insert("y".into(), float(pose.y));
        entry.insert("angle_degrees".into(), float(pose.yaw.to_degrees()));
        entry.insert("angle_radians".into(), float(pose.yaw));
        entries.push(Value::Mapping(entry));
    }

    let mut root = Mapping::new();
    root.insert(
        "format_version".into(),
        Value::String(WAYPOINT_FORMAT_VERSION.to_string()),
    );
    root.insert("waypoints".into(), Value::Sequence(entries));
    Ok(Value::Mapping(root))
}

/// Text-level conversion, current format to legacy.
pub fn convert_to_legacy(text: &str) -> Result<String> {
    let file = WaypointFile::from_yaml_str(text)?;
    serde_yaml::to_string(&to_legacy(&file)).map_err(|e| WaypointFileError::Parse(e.to_string()).into())
}

/// Text-level conversion, legacy format to current.
pub fn convert_from_legacy(text: &str) -> Result<String> {
    let doc: Value =
        serde_yaml::from_str(text).map_err(|e| WaypointFileError::Parse(e.to_string()))?;
    serde_yaml::to_string(&from_legacy(&doc)?)
        .map_err(|e| WaypointFileError::Parse(e.to_string()).into())
}
