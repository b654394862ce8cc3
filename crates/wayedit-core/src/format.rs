//! Waypoint export format descriptor.
//!
//! A descriptor is an ordered list of `(field name, scalar type)` pairs plus a
//! version string. Users edit it as YAML text:
//!
//! ```yaml
//! version: '1.0'
//! format:
//!   number: int
//!   x: float
//! ```
//!
//! Type names are validated when the descriptor is parsed, so a descriptor that
//! exists is always usable for export.

use crate::constants::WAYPOINT_FORMAT_VERSION;
use crate::error::{Result, WaypointFileError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;

/// The scalar types a waypoint field can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int,
    Float,
    Str,
    Bool,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "str" => Ok(Self::Str),
            "bool" => Ok(Self::Bool),
            _ => Err(()),
        }
    }
}

/// One exported field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ScalarType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered export schema for waypoint files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub version: String,
    pub fields: Vec<FieldSpec>,
}

impl Default for FormatDescriptor {
    fn default() -> Self {
        Self {
            version: WAYPOINT_FORMAT_VERSION.to_string(),
            fields: vec![
                FieldSpec::new("number", ScalarType::Int),
                FieldSpec::new("x", ScalarType::Float),
                FieldSpec::new("y", ScalarType::Float),
                FieldSpec::new("angle_degrees", ScalarType::Float),
                FieldSpec::new("angle_radians", ScalarType::Float),
            ],
        }
    }
}

impl FormatDescriptor {
    /// Parse the user-editable YAML form. Requires `version` and `format`.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(text)
            .map_err(|e| WaypointFileError::Parse(e.to_string()))?;
        let Value::Mapping(root) = doc else {
            return Err(WaypointFileError::InvalidFormat(
                "descriptor must be a mapping".to_string(),
            )
            .into());
        };

        let version = match root.get("version") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(WaypointFileError::InvalidFormat(format!(
                    "version must be a string, got {other:?}"
                ))
                .into())
            }
            None => return Err(WaypointFileError::MissingKey("version".to_string()).into()),
        };

        let format = match root.get("format") {
            Some(Value::Mapping(m)) => m,
            Some(_) => {
                return Err(WaypointFileError::InvalidFormat(
                    "format must map field names to types".to_string(),
                )
                .into())
            }
            None => return Err(WaypointFileError::MissingKey("format".to_string()).into()),
        };

        let mut fields = Vec::with_capacity(format.len());
        for (key, value) in format {
            let Value::String(name) = key else {
                return Err(WaypointFileError::InvalidFormat(format!(
                    "field name must be a string, got {key:?}"
                ))
                .into());
            };
            let ty_name = value.as_str().unwrap_or_default();
            let ty = ty_name
                .parse::<ScalarType>()
                .map_err(|_| WaypointFileError::UnknownType {
                    field: name.clone(),
                    ty: ty_name.to_string(),
                })?;
            fields.push(FieldSpec::new(name.clone(), ty));
        }

        if fields.is_empty() {
            return Err(WaypointFileError::InvalidFormat("format has no fields".to_string()).into());
        }

        tracing::debug!("Parsed waypoint format v{} with {} fields", version, fields.len());
        Ok(Self { version, fields })
    }

    /// Render back to the user-editable YAML form.
    pub fn to_yaml_string(&self) -> String {
        let mut format = Mapping::new();
        for field in &self.fields {
            format.insert(
                Value::String(field.name.clone()),
                Value::String(field.ty.as_str().to_string()),
            );
        }
        let mut root = Mapping::new();
        root.insert("version".into(), Value::String(self.version.clone()));
        root.insert("format".into(), Value::Mapping(format));
        // A mapping of strings always serializes.
        serde_yaml::to_string(&Value::Mapping(root)).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
