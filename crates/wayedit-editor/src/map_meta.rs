//! Map sidecar metadata (`map.yaml`).
//!
//! Only `image`, `origin`, and `resolution` are interpreted; threshold keys
//! written by map savers are accepted and carried along unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wayedit_core::constants::DEFAULT_RESOLUTION;
use wayedit_core::{MetadataError, PixelPoint, Result};

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

/// Parsed and validated sidecar contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    /// PGM path, relative to the sidecar's directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Meters per pixel
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// `[x, y, yaw]` of the lower-left pixel in meters; yaw is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_thresh: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_thresh: Option<f64>,
}

impl MapMetadata {
    /// Parses and validates sidecar text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let meta: MapMetadata =
            serde_yaml::from_str(text).map_err(|e| MetadataError::Parse(e.to_string()))?;
        meta.validate()?;
        Ok(meta)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.is_none() && self.origin.is_none() {
            return Err(MetadataError::MissingKey("origin".to_string()).into());
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(MetadataError::InvalidValue {
                key: "resolution".to_string(),
                reason: format!("must be a positive number, got {}", self.resolution),
            }
            .into());
        }
        if let Some(origin) = &self.origin {
            if origin.len() < 2 {
                return Err(MetadataError::InvalidValue {
                    key: "origin".to_string(),
                    reason: format!("expected at least 2 values, got {}", origin.len()),
                }
                .into());
            }
            if origin.iter().take(2).any(|v| !v.is_finite()) {
                return Err(MetadataError::InvalidValue {
                    key: "origin".to_string(),
                    reason: "coordinates must be finite".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolves `image` against the directory holding the sidecar.
    pub fn image_path(&self, sidecar: &Path) -> Option<PathBuf> {
        let image = self.image.as_ref()?;
        let dir = sidecar.parent().unwrap_or_else(|| Path::new(""));
        Some(dir.join(image))
    }

    /// Pixel position of the metric origin.
    ///
    /// `x = trunc(-origin_x / resolution)`, likewise for `y`; when the map
    /// height is known the row is flipped to `height - y`.
    pub fn origin_pixel(&self, map_height: Option<u32>) -> Option<PixelPoint> {
        let origin = self.origin.as_ref()?;
        let x = (-origin[0] / self.resolution) as i32;
        let y = (-origin[1] / self.resolution) as i32;
        let y = match map_height {
            Some(h) => h as i32 - y,
            None => y,
        };
        Some(PixelPoint::new(x, y))
    }
}
