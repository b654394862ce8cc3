//! # wayedit-editor
//!
//! Map and waypoint editing for robot occupancy grids.
//!
//! ## Architecture
//!
//! 1. **transform** - pixel / display / metric conversions
//! 2. **waypoint** - numbered poses and their ordered collection
//! 3. **layer**, **compositor**, **markers** - raster layers and how they are painted
//! 4. **pgm**, **map_meta**, **waypoint_io**, **legacy** - file formats
//! 5. **document** - `MapDocument`, which ties everything together and drives
//!    the interaction state machine in **state**
//! 6. **events** - synchronous change notifications

pub mod compositor;
pub mod document;
pub mod events;
pub mod layer;
pub mod legacy;
pub mod map_meta;
pub mod markers;
pub mod pgm;
pub mod state;
pub mod transform;
pub mod waypoint;
pub mod waypoint_io;

pub use compositor::{Compositor, GridOverlay};
pub use document::{CursorReadout, DocumentOptions, ImportOutcome, MapDocument, ToolSettings};
pub use events::{DocumentEvent, DocumentListener, EventDispatcher, ListenerHandle};
pub use layer::{Layer, LayerKind, LayerStack};
pub use map_meta::MapMetadata;
pub use markers::StrokeTool;
pub use state::{EditPhase, InteractionState, Modifiers, PlacementPhase, PointerButton, Tool, ToolMode};
pub use transform::{CoordinateTransform, MapFrame};
pub use waypoint::{Waypoint, WaypointCollection};
pub use waypoint_io::{ImportReport, SkippedEntry, VersionMismatch, WaypointFile};

pub use wayedit_core::{DisplayPoint, MetricPoint, PixelPoint};
