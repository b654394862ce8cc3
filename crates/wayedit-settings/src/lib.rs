//! wayedit Settings Crate
//!
//! Handles editor configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, EditorSettings, ExportSettings, MAX_RECENT_FILES};
pub use error::{SettingsError, SettingsResult};
