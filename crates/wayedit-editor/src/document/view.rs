//! View state: scale, layer controls, grid, path, cursor readout, and rendering.

use std::fmt;

use tiny_skia::{Color, Pixmap};
use wayedit_core::constants::{DEFAULT_SCALE, ZOOM_STEP};
use wayedit_core::{DisplayPoint, MetricPoint, PixelPoint};

use super::MapDocument;
use crate::compositor::scale_for_display;
use crate::events::DocumentEvent;
use crate::layer::LayerKind;
use crate::markers;

/// Map and metric position under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    pub pixel: PixelPoint,
    pub metric: MetricPoint,
}

impl fmt::Display for CursorReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel: {}  Metric: {}", self.pixel, self.metric)
    }
}

impl MapDocument {
    pub fn scale_factor(&self) -> f64 {
        self.transform.scale_factor()
    }

    /// Sets the display scale; out-of-range values are ignored.
    pub fn set_scale_factor(&mut self, scale: f64) -> bool {
        if !self.transform.set_scale_factor(scale) {
            return false;
        }
        self.invalidate();
        self.emit(DocumentEvent::ScaleChanged(scale));
        true
    }

    /// Applies a relative zoom (wheel or pinch) if the result stays in range.
    pub fn scale_by(&mut self, factor: f64) -> bool {
        self.set_scale_factor(self.scale_factor() * factor)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.scale_by(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.scale_by(1.0 / ZOOM_STEP)
    }

    pub fn zoom_reset(&mut self) -> bool {
        self.set_scale_factor(DEFAULT_SCALE)
    }

    /// Size of the rendered frame in display pixels.
    pub fn display_size(&self) -> Option<(u32, u32)> {
        let (w, h) = self.map_size()?;
        let scale = self.scale_factor();
        Some((
            ((w as f64 * scale) as u32).max(1),
            ((h as f64 * scale) as u32).max(1),
        ))
    }

    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) -> bool {
        if !self.layers.get_mut(kind).set_visible(visible) {
            return false;
        }
        self.invalidate();
        self.emit(DocumentEvent::LayerChanged(kind));
        true
    }

    pub fn set_layer_opacity(&mut self, kind: LayerKind, opacity: f32) -> bool {
        if !self.layers.get_mut(kind).set_opacity(opacity) {
            return false;
        }
        self.invalidate();
        self.emit(DocumentEvent::LayerChanged(kind));
        true
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        if self.grid_visible != visible {
            self.grid_visible = visible;
            self.invalidate();
        }
    }

    pub fn set_grid_size(&mut self, spacing: u32) {
        if spacing > 0 && spacing != self.grid.spacing {
            self.grid.spacing = spacing;
            self.invalidate();
        }
    }

    pub fn path_enabled(&self) -> bool {
        self.path_enabled
    }

    pub fn set_path_enabled(&mut self, enabled: bool) {
        if self.path_enabled != enabled {
            self.path_enabled = enabled;
            self.refresh_path();
            self.invalidate();
            self.emit(DocumentEvent::LayerChanged(LayerKind::Path));
        }
    }

    /// Regenerates the path layer from the current waypoint order.
    pub(super) fn refresh_path(&mut self) {
        let points: Vec<PixelPoint> = if self.path_enabled && self.waypoints.len() >= 2 {
            self.waypoints.iter().map(|w| w.pixel()).collect()
        } else {
            Vec::new()
        };
        let Some(raster) = self.layers.get_mut(LayerKind::Path).raster_mut() else {
            return;
        };
        raster.fill(Color::TRANSPARENT);
        markers::draw_path(raster, &points);
    }

    fn refresh_waypoint_layer(&mut self) {
        let size = self.tools.waypoint_size as f32;
        let editing = self.state.editing();
        let Some(raster) = self.layers.get_mut(LayerKind::Waypoints).raster_mut() else {
            return;
        };
        raster.fill(Color::TRANSPARENT);
        for waypoint in self.waypoints.iter() {
            markers::draw_waypoint(raster, waypoint, size, editing == Some(waypoint.number()));
        }
    }

    /// Pixel and metric position under a display point; needs a map and an origin.
    pub fn cursor_readout(&self, pos: DisplayPoint) -> Option<CursorReadout> {
        if !self.has_map() {
            return None;
        }
        let pixel = self.transform.display_to_pixel(pos)?;
        let metric = self.transform.pixel_to_metric(pixel)?;
        Some(CursorReadout { pixel, metric })
    }

    /// Composites all layers at map resolution.
    pub fn compose(&mut self) -> Option<Pixmap> {
        self.refresh_waypoint_layer();
        let grid = self.grid_visible.then_some(self.grid);
        self.compositor.compose(&self.layers, grid.as_ref())
    }

    /// Composited frame scaled for display; cached until something changes.
    pub fn render(&mut self) -> Option<&Pixmap> {
        if self.frame_cache.is_none() {
            let frame = self.compose()?;
            self.frame_cache = scale_for_display(&frame, self.scale_factor());
        }
        self.frame_cache.as_ref()
    }
}
