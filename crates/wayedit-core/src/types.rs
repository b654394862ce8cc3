//! Point types for the three coordinate spaces the editor works in.
//!
//! - [`PixelPoint`]: integer map pixels, origin top-left, +y down
//! - [`DisplayPoint`]: scaled screen pixels, `pixel * scale_factor`
//! - [`MetricPoint`]: meters relative to the map origin, +y up

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on the map raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when both axis offsets to `other` are strictly below `radius`.
    pub fn within_box(&self, other: &PixelPoint, radius: i32) -> bool {
        let radius = i64::from(radius);
        (i64::from(self.x) - i64::from(other.x)).abs() < radius
            && (i64::from(self.y) - i64::from(other.y)).abs() < radius
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position on the scaled view of the map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DisplayPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A position in meters relative to the map origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricPoint {
    pub x: f64,
    pub y: f64,
}

impl MetricPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for MetricPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
