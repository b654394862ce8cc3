//! Waypoint operations for the map document.

use wayedit_core::constants::EDIT_HIT_RADIUS;
use wayedit_core::PixelPoint;

use super::MapDocument;
use crate::events::DocumentEvent;
use crate::state::InteractionState;
use crate::waypoint::Waypoint;

impl MapDocument {
    pub fn add_waypoint(&mut self, pixel: PixelPoint, angle: f64) -> Waypoint {
        let waypoint = self.waypoints.add(pixel, angle);
        tracing::debug!("Added {}", waypoint.display_name());
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointAdded(waypoint.clone()));
        waypoint
    }

    /// Removes a waypoint and renumbers the rest. Returns false for unknown numbers.
    pub fn remove_waypoint(&mut self, number: u32) -> bool {
        if self.waypoints.remove(number).is_none() {
            return false;
        }
        if let InteractionState::EditingWaypoint { number: editing, phase } = self.state {
            if editing == number {
                self.set_state(InteractionState::Idle);
            } else if editing > number {
                self.set_state(InteractionState::EditingWaypoint {
                    number: editing - 1,
                    phase,
                });
            }
        }
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointRemoved(number));
        self.emit(DocumentEvent::WaypointsRenumbered);
        true
    }

    pub fn remove_all_waypoints(&mut self) {
        if self.state.editing().is_some() {
            self.set_state(InteractionState::Idle);
        }
        self.waypoints.remove_all();
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointsCleared);
    }

    /// Moves `source` to `target`'s slot; see [`crate::WaypointCollection::reorder`].
    ///
    /// Leaves waypoint edit mode, since numbers change.
    pub fn reorder_waypoints(&mut self, source: u32, target: u32) -> bool {
        if !self.waypoints.reorder(source, target) {
            return false;
        }
        if self.state.editing().is_some() {
            self.set_state(InteractionState::Idle);
        }
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointsRenumbered);
        true
    }

    pub fn set_waypoint_position(&mut self, number: u32, pixel: PixelPoint) -> Option<Waypoint> {
        let waypoint = self.waypoints.set_position(number, pixel)?.clone();
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointUpdated(waypoint.clone()));
        Some(waypoint)
    }

    pub fn set_waypoint_angle(&mut self, number: u32, angle: f64) -> Option<Waypoint> {
        let waypoint = self.waypoints.set_angle(number, angle)?.clone();
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointUpdated(waypoint.clone()));
        Some(waypoint)
    }

    /// Waypoint under a map pixel, first match in collection order.
    pub fn waypoint_at(&self, pixel: PixelPoint) -> Option<u32> {
        self.waypoints.hit_test(pixel, EDIT_HIT_RADIUS)
    }

    pub(super) fn replace_waypoints(&mut self, poses: Vec<(PixelPoint, f64)>) {
        if self.state.editing().is_some() {
            self.set_state(InteractionState::Idle);
        }
        self.waypoints.replace_all(poses);
        self.after_waypoints_changed();
        self.emit(DocumentEvent::WaypointsCleared);
        let added: Vec<_> = self.waypoints.iter().cloned().collect();
        for waypoint in added {
            self.emit(DocumentEvent::WaypointAdded(waypoint));
        }
    }

    fn after_waypoints_changed(&mut self) {
        self.refresh_path();
        self.invalidate();
    }
}
