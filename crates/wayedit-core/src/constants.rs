//! Editor-wide constants.

/// Meters per map pixel when a sidecar omits `resolution`.
pub const DEFAULT_RESOLUTION: f64 = 0.05;

/// Smallest display scale factor.
pub const MIN_SCALE: f64 = 0.02;
/// Largest display scale factor.
pub const MAX_SCALE: f64 = 2.0;
/// Display scale factor after a reset.
pub const DEFAULT_SCALE: f64 = 1.0;
/// Multiplier applied by a single zoom step.
pub const ZOOM_STEP: f64 = 1.2;

/// Pen width in display pixels.
pub const DEFAULT_PEN_SIZE: u32 = 2;
pub const MIN_PEN_SIZE: u32 = 1;
pub const MAX_PEN_SIZE: u32 = 20;

/// Eraser width in display pixels.
pub const DEFAULT_ERASER_SIZE: u32 = 10;
pub const MIN_ERASER_SIZE: u32 = 5;
pub const MAX_ERASER_SIZE: u32 = 50;

/// Radius of a waypoint marker in map pixels.
pub const DEFAULT_WAYPOINT_SIZE: u32 = 15;
/// Marker growth while a waypoint is being edited.
pub const EDIT_SIZE_MULTIPLIER: f64 = 1.2;
/// Half-width of the square hit box used to pick a waypoint.
pub const EDIT_HIT_RADIUS: i32 = 15;

/// Grid spacing in map pixels.
pub const DEFAULT_GRID_SIZE: u32 = 50;
/// Opacity of the grid overlay.
pub const GRID_OPACITY: f32 = 0.3;

/// Half-length of the origin cross arms; also the circle diameter.
pub const ORIGIN_MARKER_SIZE: f32 = 20.0;
/// Pen width shared by the origin cross, waypoint headings, and path segments.
pub const MARKER_LINE_WIDTH: f32 = 3.0;

/// How long transient status hints stay visible.
pub const STATUS_MESSAGE_TIMEOUT_MS: u64 = 3000;

/// Version written into exported waypoint files.
pub const WAYPOINT_FORMAT_VERSION: &str = "1.0";
