//! Configuration for the wayedit map editor
//!
//! Supports JSON and TOML files; the format is chosen by file extension.
//! Configuration is organized into sections:
//! - Editor settings (tool sizes, marker size, grid, display scale)
//! - Export settings (waypoint format descriptor)
//! - Recently opened maps

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wayedit_core::constants::{
    DEFAULT_ERASER_SIZE, DEFAULT_GRID_SIZE, DEFAULT_PEN_SIZE, DEFAULT_SCALE,
    DEFAULT_WAYPOINT_SIZE, MAX_ERASER_SIZE, MAX_PEN_SIZE, MAX_SCALE, MIN_ERASER_SIZE,
    MIN_PEN_SIZE, MIN_SCALE,
};
use wayedit_core::FormatDescriptor;

use crate::error::{SettingsError, SettingsResult};

/// Maximum number of entries kept in the recent files list
pub const MAX_RECENT_FILES: usize = 10;

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Pen width in display pixels
    pub pen_size: u32,
    /// Eraser width in display pixels
    pub eraser_size: u32,
    /// Waypoint marker radius in map pixels
    pub waypoint_size: u32,
    /// Grid spacing in map pixels
    pub grid_size: u32,
    pub show_grid: bool,
    pub show_path: bool,
    /// Initial display scale
    pub scale: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            pen_size: DEFAULT_PEN_SIZE,
            eraser_size: DEFAULT_ERASER_SIZE,
            waypoint_size: DEFAULT_WAYPOINT_SIZE,
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: false,
            show_path: false,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Waypoint export settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub waypoint_format: FormatDescriptor,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub export: ExportSettings,
    /// Most recent first
    pub recent_files: Vec<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/wayedit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("wayedit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let editor = &self.editor;

        if !(MIN_PEN_SIZE..=MAX_PEN_SIZE).contains(&editor.pen_size) {
            return Err(SettingsError::invalid(
                "editor.pen_size",
                format!("must be in {}..={}", MIN_PEN_SIZE, MAX_PEN_SIZE),
            ));
        }

        if !(MIN_ERASER_SIZE..=MAX_ERASER_SIZE).contains(&editor.eraser_size) {
            return Err(SettingsError::invalid(
                "editor.eraser_size",
                format!("must be in {}..={}", MIN_ERASER_SIZE, MAX_ERASER_SIZE),
            ));
        }

        if editor.waypoint_size == 0 {
            return Err(SettingsError::invalid("editor.waypoint_size", "must be > 0"));
        }

        if editor.grid_size == 0 {
            return Err(SettingsError::invalid("editor.grid_size", "must be > 0"));
        }

        if !(MIN_SCALE..=MAX_SCALE).contains(&editor.scale) {
            return Err(SettingsError::invalid(
                "editor.scale",
                format!("must be in [{}, {}]", MIN_SCALE, MAX_SCALE),
            ));
        }

        if self.export.waypoint_format.fields.is_empty() {
            return Err(SettingsError::invalid(
                "export.waypoint_format",
                "must list at least one field",
            ));
        }

        Ok(())
    }

    /// Add file to the front of the recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}
