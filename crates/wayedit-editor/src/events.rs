//! Document notifications
//!
//! Provides:
//! - Event types for map, layer, view, and waypoint changes
//! - A synchronous dispatcher delivering events to registered listeners
//!
//! Events are delivered on the caller's thread before the mutating call
//! returns, in the order the changes happened.

use std::fmt;
use std::time::Duration;

use wayedit_core::PixelPoint;

use crate::layer::LayerKind;
use crate::state::ToolMode;
use crate::waypoint::Waypoint;

/// Document event types
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// A base map was loaded
    MapLoaded {
        /// Map width in pixels.
        width: u32,
        /// Map height in pixels.
        height: u32,
    },
    /// The metric origin was set or moved
    OriginChanged(PixelPoint),
    /// A layer's visibility or opacity changed
    LayerChanged(LayerKind),
    /// Display scale changed
    ScaleChanged(f64),
    /// The interaction mode changed
    ModeChanged(ToolMode),
    /// A waypoint was appended
    WaypointAdded(Waypoint),
    /// A waypoint's position or heading changed
    WaypointUpdated(Waypoint),
    /// A waypoint was removed (number before removal)
    WaypointRemoved(u32),
    /// All waypoints were removed
    WaypointsCleared,
    /// Waypoint numbers changed after a reorder, removal, or import
    WaypointsRenumbered,
    /// A transient status hint
    StatusMessage {
        /// Message text.
        text: String,
        /// How long the hint should stay visible.
        timeout: Duration,
    },
}

impl fmt::Display for DocumentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapLoaded { width, height } => write!(f, "Map loaded ({}x{})", width, height),
            Self::OriginChanged(p) => write!(f, "Origin at {}", p),
            Self::LayerChanged(kind) => write!(f, "{} changed", kind),
            Self::ScaleChanged(scale) => write!(f, "Scale: {:.0}%", scale * 100.0),
            Self::ModeChanged(mode) => write!(f, "Mode: {}", mode),
            Self::WaypointAdded(w) => write!(f, "Added {}", w.display_name()),
            Self::WaypointUpdated(w) => write!(f, "Updated {}", w.display_name()),
            Self::WaypointRemoved(n) => write!(f, "Removed waypoint {}", n),
            Self::WaypointsCleared => write!(f, "Waypoints cleared"),
            Self::WaypointsRenumbered => write!(f, "Waypoints renumbered"),
            Self::StatusMessage { text, .. } => f.write_str(text),
        }
    }
}

/// Handle for a registered listener; used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Listener trait for document events
pub trait DocumentListener {
    fn on_event(&mut self, event: &DocumentEvent);
}

impl<F> DocumentListener for F
where
    F: FnMut(&DocumentEvent),
{
    fn on_event(&mut self, event: &DocumentEvent) {
        self(event)
    }
}

/// Delivers events to listeners in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: u64,
    listeners: Vec<(ListenerHandle, Box<dyn DocumentListener>)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl DocumentListener + 'static) -> ListenerHandle {
        self.next_id += 1;
        let handle = ListenerHandle(self.next_id);
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Returns false if the handle was not registered.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: DocumentEvent) {
        tracing::trace!("event: {}", event);
        for (_, listener) in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
