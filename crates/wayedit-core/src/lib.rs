//! # wayedit-core
//!
//! Shared foundation for the wayedit workspace: error types, point types for
//! the pixel / display / metric coordinate spaces, editor constants, and the
//! waypoint export format descriptor.

pub mod constants;
pub mod error;
pub mod format;
pub mod types;

pub use error::{Error, MapError, MetadataError, Result, WaypointFileError};
pub use format::{FieldSpec, FormatDescriptor, ScalarType};
pub use types::{DisplayPoint, MetricPoint, PixelPoint};
