//! Coordinate transformation between map pixels, display pixels, and meters.
//!
//! Map pixels have (0,0) at the top-left with +y going down. Metric
//! coordinates are relative to the map origin pixel with +y going up:
//!
//! ```text
//! display  = pixel * scale
//! metric_x = (pixel_x - origin_x) * resolution
//! metric_y = (origin_y - pixel_y) * resolution  // Flip Y-axis
//! ```
//!
//! Conversions into pixels truncate toward zero.

use std::fmt;

use wayedit_core::constants::{DEFAULT_RESOLUTION, DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};
use wayedit_core::{DisplayPoint, MetricPoint, PixelPoint};

/// Converts a map pixel to its position on the scaled display.
pub fn pixel_to_display(p: PixelPoint, scale: f64) -> DisplayPoint {
    DisplayPoint::new(p.x as f64 * scale, p.y as f64 * scale)
}

/// Converts a display position back to a map pixel.
///
/// Returns `None` for a non-positive scale.
pub fn display_to_pixel(d: DisplayPoint, scale: f64) -> Option<PixelPoint> {
    if scale <= 0.0 || !scale.is_finite() {
        return None;
    }
    Some(PixelPoint::new((d.x / scale) as i32, (d.y / scale) as i32))
}

/// Converts a map pixel to meters relative to `origin`.
pub fn pixel_to_metric(p: PixelPoint, origin: PixelPoint, resolution: f64) -> MetricPoint {
    let rel_x = p.x as f64 - origin.x as f64;
    let rel_y = origin.y as f64 - p.y as f64;
    MetricPoint::new(rel_x * resolution, rel_y * resolution)
}

/// Converts meters relative to `origin` to a map pixel.
pub fn metric_to_pixel(m: MetricPoint, origin: PixelPoint, resolution: f64) -> PixelPoint {
    let x = origin.x as f64 + m.x / resolution;
    let y = origin.y as f64 - m.y / resolution;
    PixelPoint::new(x as i32, y as i32)
}

/// Like [`metric_to_pixel`], but `None` when the pixel does not fit in `i32`.
pub fn try_metric_to_pixel(
    m: MetricPoint,
    origin: PixelPoint,
    resolution: f64,
) -> Option<PixelPoint> {
    let x = (origin.x as f64 + m.x / resolution).trunc();
    let y = (origin.y as f64 - m.y / resolution).trunc();
    let range = i32::MIN as f64..=i32::MAX as f64;
    (range.contains(&x) && range.contains(&y)).then(|| PixelPoint::new(x as i32, y as i32))
}

/// Origin pixel and resolution of a loaded map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFrame {
    pub origin: PixelPoint,
    pub resolution: f64,
}

impl MapFrame {
    pub fn new(origin: PixelPoint, resolution: f64) -> Self {
        Self { origin, resolution }
    }

    pub fn to_metric(&self, p: PixelPoint) -> MetricPoint {
        pixel_to_metric(p, self.origin, self.resolution)
    }

    pub fn to_pixel(&self, m: MetricPoint) -> PixelPoint {
        metric_to_pixel(m, self.origin, self.resolution)
    }

    pub fn try_to_pixel(&self, m: MetricPoint) -> Option<PixelPoint> {
        try_metric_to_pixel(m, self.origin, self.resolution)
    }
}

/// Current view scale plus the optional map frame.
#[derive(Debug, Clone)]
pub struct CoordinateTransform {
    scale_factor: f64,
    origin: Option<PixelPoint>,
    resolution: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE,
            origin: None,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl CoordinateTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current scale factor (1.0 = one display pixel per map pixel).
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Sets the scale factor; values outside the allowed range are ignored.
    ///
    /// Returns true when the scale changed.
    pub fn set_scale_factor(&mut self, scale: f64) -> bool {
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) || scale == self.scale_factor {
            return false;
        }
        self.scale_factor = scale;
        true
    }

    pub fn origin(&self) -> Option<PixelPoint> {
        self.origin
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn set_frame(&mut self, origin: PixelPoint, resolution: f64) {
        self.origin = Some(origin);
        self.resolution = resolution;
    }

    pub fn frame(&self) -> Option<MapFrame> {
        self.origin.map(|o| MapFrame::new(o, self.resolution))
    }

    pub fn pixel_to_display(&self, p: PixelPoint) -> DisplayPoint {
        pixel_to_display(p, self.scale_factor)
    }

    pub fn display_to_pixel(&self, d: DisplayPoint) -> Option<PixelPoint> {
        display_to_pixel(d, self.scale_factor)
    }

    /// Metric position of a pixel, or `None` before an origin is known.
    pub fn pixel_to_metric(&self, p: PixelPoint) -> Option<MetricPoint> {
        self.frame().map(|f| f.to_metric(p))
    }

    pub fn metric_to_pixel(&self, m: MetricPoint) -> Option<PixelPoint> {
        self.frame().map(|f| f.to_pixel(m))
    }
}

impl fmt::Display for CoordinateTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(o) => write!(
                f,
                "Scale: {:.0}%, Origin: {}, Resolution: {} m/px",
                self.scale_factor * 100.0,
                o,
                self.resolution
            ),
            None => write!(f, "Scale: {:.0}%, no origin", self.scale_factor * 100.0),
        }
    }
}
