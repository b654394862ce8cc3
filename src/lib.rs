//! # wayedit
//!
//! Map and waypoint editor for robot occupancy grids stored as binary PGM
//! images with a YAML sidecar.
//!
//! ## Architecture
//!
//! wayedit is organized as a workspace with multiple crates:
//!
//! 1. **wayedit-core** - Errors, point types, constants, waypoint format descriptor
//! 2. **wayedit-editor** - Map document, layers, compositing, file formats
//! 3. **wayedit-settings** - Configuration and persistence
//! 4. **wayedit** - Command-line front end that integrates all crates

pub mod commands;

pub use wayedit_core::{
    DisplayPoint, Error, FormatDescriptor, MetricPoint, PixelPoint, Result, ScalarType,
};
pub use wayedit_editor::{
    DocumentEvent, DocumentOptions, ImportOutcome, LayerKind, MapDocument, Tool, ToolSettings,
    Waypoint, WaypointCollection,
};
pub use wayedit_settings::{Config, EditorSettings, ExportSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Document options seeded from the user configuration
pub fn document_options(config: &Config) -> DocumentOptions {
    let editor = &config.editor;
    DocumentOptions {
        tools: ToolSettings {
            pen_size: editor.pen_size,
            eraser_size: editor.eraser_size,
            waypoint_size: editor.waypoint_size,
        },
        grid_size: editor.grid_size,
        show_grid: editor.show_grid,
        show_path: editor.show_path,
        scale: editor.scale,
        format: config.export.waypoint_format.clone(),
    }
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - stderr output with pretty formatting, so command output on stdout stays clean
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
