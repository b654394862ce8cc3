//! Error handling for wayedit
//!
//! Provides error types for each file format the editor reads and writes:
//! - Map errors (binary PGM rasters)
//! - Metadata errors (map sidecar YAML)
//! - Waypoint file errors (waypoint YAML and its format descriptor)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// PGM map error type
///
/// Represents errors decoding or encoding a binary (P5) grayscale raster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The file does not start with the `P5` magic number
    #[error("Not a binary PGM file (magic was {found:?})")]
    InvalidMagic {
        /// The magic token that was found instead.
        found: String,
    },

    /// The raster is not 8-bit grayscale (e.g. `maxval` above 255)
    #[error("Unsupported PGM sample format {0} (expected 8-bit grayscale)")]
    UnsupportedColorType(String),

    /// The header or pixel payload could not be decoded
    #[error("Failed to decode PGM: {0}")]
    Decode(String),

    /// The raster could not be encoded
    #[error("Failed to encode PGM: {0}")]
    Encode(String),
}

/// Map sidecar metadata error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataError {
    /// The document is not valid YAML
    #[error("Invalid map metadata YAML: {0}")]
    Parse(String),

    /// Neither `origin` nor `image` is present
    #[error("Map metadata is missing required key '{0}'")]
    MissingKey(String),

    /// A key is present but its value is unusable
    #[error("Invalid map metadata value for '{key}': {reason}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Waypoint file error type
///
/// Covers the waypoint YAML document, the user-editable format descriptor,
/// and import preconditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaypointFileError {
    /// The document is not valid YAML
    #[error("Invalid waypoint YAML: {0}")]
    Parse(String),

    /// A required top-level key is missing
    #[error("Waypoint document is missing required key '{0}'")]
    MissingKey(String),

    /// The format descriptor names a type that cannot be produced
    #[error("Unknown type '{ty}' for field '{field}'")]
    UnknownType {
        /// The field whose type is unknown.
        field: String,
        /// The unknown type name.
        ty: String,
    },

    /// The format descriptor is structurally invalid
    #[error("Invalid waypoint format: {0}")]
    InvalidFormat(String),

    /// Import needs an origin to convert metric coordinates to pixels
    #[error("No map origin loaded; load a map sidecar before importing waypoints")]
    OriginNotSet,
}

/// Main error type for wayedit
///
/// This is the primary error type used throughout the library.
/// It can represent any error from the file codecs or I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// Map raster error
    #[error(transparent)]
    Map(#[from] MapError),

    /// Map metadata error
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Waypoint file error
    #[error(transparent)]
    Waypoint(#[from] WaypointFileError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error with a message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Check if this is a PGM codec error
    pub fn is_map_error(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Check if this is a metadata error
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }

    /// Check if this is a waypoint file error
    pub fn is_waypoint_error(&self) -> bool {
        matches!(self, Self::Waypoint(_))
    }
}

/// Result type for wayedit operations
pub type Result<T> = std::result::Result<T, Error>;
