//! Map document
//!
//! Aggregates the base map, derived layers, waypoints, coordinate transform,
//! and interaction state. All mutation goes through `MapDocument` methods so
//! that derived layers, the cached frame, and listeners stay in sync.

mod file_io;
mod interaction;
mod view;
mod waypoints;

use std::path::{Path, PathBuf};

use image::GrayImage;
use tiny_skia::Pixmap;
use wayedit_core::constants::{
    DEFAULT_ERASER_SIZE, DEFAULT_GRID_SIZE, DEFAULT_PEN_SIZE, DEFAULT_SCALE, DEFAULT_WAYPOINT_SIZE,
    MAX_ERASER_SIZE, MAX_PEN_SIZE, MIN_ERASER_SIZE, MIN_PEN_SIZE,
};
use wayedit_core::{FormatDescriptor, PixelPoint};

use crate::compositor::{Compositor, GridOverlay};
use crate::events::{DocumentEvent, DocumentListener, EventDispatcher, ListenerHandle};
use crate::layer::LayerStack;
use crate::map_meta::MapMetadata;
use crate::state::{InteractionState, ToolMode};
use crate::transform::CoordinateTransform;
use crate::waypoint::WaypointCollection;

pub use file_io::ImportOutcome;
pub use view::CursorReadout;

/// Tool sizes in display pixels and marker size in map pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    pub pen_size: u32,
    pub eraser_size: u32,
    pub waypoint_size: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pen_size: DEFAULT_PEN_SIZE,
            eraser_size: DEFAULT_ERASER_SIZE,
            waypoint_size: DEFAULT_WAYPOINT_SIZE,
        }
    }
}

/// Initial document configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    pub tools: ToolSettings,
    pub grid_size: u32,
    pub show_grid: bool,
    pub show_path: bool,
    pub scale: f64,
    pub format: FormatDescriptor,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            tools: ToolSettings::default(),
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: false,
            show_path: false,
            scale: DEFAULT_SCALE,
            format: FormatDescriptor::default(),
        }
    }
}

/// The editable map, its layers, and its waypoints.
#[derive(Debug)]
pub struct MapDocument {
    layers: LayerStack,
    base_map: Option<GrayImage>,
    metadata: Option<MapMetadata>,
    map_path: Option<PathBuf>,
    waypoints: WaypointCollection,
    transform: CoordinateTransform,
    state: InteractionState,
    tools: ToolSettings,
    grid: GridOverlay,
    grid_visible: bool,
    path_enabled: bool,
    compositor: Compositor,
    format: FormatDescriptor,
    events: EventDispatcher,
    is_modified: bool,
    frame_cache: Option<Pixmap>,
}

impl Default for MapDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MapDocument {
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let mut transform = CoordinateTransform::new();
        transform.set_scale_factor(options.scale);
        let tools = ToolSettings {
            pen_size: options.tools.pen_size.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE),
            eraser_size: options.tools.eraser_size.clamp(MIN_ERASER_SIZE, MAX_ERASER_SIZE),
            waypoint_size: options.tools.waypoint_size.max(1),
        };
        Self {
            layers: LayerStack::new(),
            base_map: None,
            metadata: None,
            map_path: None,
            waypoints: WaypointCollection::new(),
            transform,
            state: InteractionState::Idle,
            tools,
            grid: GridOverlay {
                spacing: options.grid_size,
                ..GridOverlay::default()
            },
            grid_visible: options.show_grid,
            path_enabled: options.show_path,
            compositor: Compositor::new(),
            format: options.format,
            events: EventDispatcher::new(),
            is_modified: false,
            frame_cache: None,
        }
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn waypoints(&self) -> &WaypointCollection {
        &self.waypoints
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> ToolMode {
        self.state.mode()
    }

    pub fn tool_settings(&self) -> ToolSettings {
        self.tools
    }

    pub fn base_map(&self) -> Option<&GrayImage> {
        self.base_map.as_ref()
    }

    pub fn has_map(&self) -> bool {
        self.base_map.is_some()
    }

    pub fn map_size(&self) -> Option<(u32, u32)> {
        self.base_map.as_ref().map(|m| m.dimensions())
    }

    pub fn metadata(&self) -> Option<&MapMetadata> {
        self.metadata.as_ref()
    }

    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    pub fn origin(&self) -> Option<PixelPoint> {
        self.transform.origin()
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Title-bar label for the loaded map.
    pub fn display_name(&self) -> String {
        let name = self
            .map_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.is_modified {
            format!("{}*", name)
        } else {
            name
        }
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    pub fn set_format(&mut self, format: FormatDescriptor) {
        self.format = format;
    }

    pub fn reset_format(&mut self) {
        self.format.reset();
    }

    pub fn subscribe(&mut self, listener: impl DocumentListener + 'static) -> ListenerHandle {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.events.unsubscribe(handle)
    }

    fn emit(&mut self, event: DocumentEvent) {
        self.events.publish(event);
    }

    /// Drops the cached display frame; the next render recomposites.
    fn invalidate(&mut self) {
        self.frame_cache = None;
    }

    /// Moves to a new interaction state, reporting coarse mode changes.
    fn set_state(&mut self, state: InteractionState) {
        let before = self.state.mode();
        let highlight_before = self.state.editing();
        self.state = state;
        if highlight_before != self.state.editing() {
            self.invalidate();
        }
        let after = self.state.mode();
        if before != after {
            tracing::debug!("Mode {} -> {}", before, after);
            self.emit(DocumentEvent::ModeChanged(after));
        }
    }
}
