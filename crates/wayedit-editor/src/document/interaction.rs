//! Tool selection and pointer handling.
//!
//! Pointer positions arrive in display coordinates and are converted to map
//! pixels with the current scale. Every handler is a no-op until a map is
//! loaded.

use std::time::Duration;

use wayedit_core::constants::{
    MAX_ERASER_SIZE, MAX_PEN_SIZE, MIN_ERASER_SIZE, MIN_PEN_SIZE, STATUS_MESSAGE_TIMEOUT_MS,
};
use wayedit_core::{DisplayPoint, PixelPoint};

use super::MapDocument;
use crate::events::DocumentEvent;
use crate::layer::LayerKind;
use crate::markers::{self, StrokeTool};
use crate::state::{
    heading, EditPhase, InteractionState, Modifiers, PlacementPhase, PointerButton, Tool, ToolMode,
};

/// Stroke width in map pixels for a tool size given in display pixels.
pub(crate) fn stroke_width(size: u32, scale: f64) -> f32 {
    ((size as f64 / scale) as u32).max(1) as f32
}

impl MapDocument {
    /// Selects a tool; selecting the active tool again (or `None`) returns to idle.
    pub fn select_tool(&mut self, tool: Option<Tool>) {
        let next = match (tool, self.state.mode()) {
            (None, _) => InteractionState::Idle,
            (Some(Tool::Pen), ToolMode::Pen)
            | (Some(Tool::Eraser), ToolMode::Eraser)
            | (Some(Tool::Waypoint), ToolMode::PlaceWaypoint) => InteractionState::Idle,
            (Some(Tool::Pen), _) => InteractionState::Drawing {
                tool: StrokeTool::Pen,
                last: None,
            },
            (Some(Tool::Eraser), _) => InteractionState::Drawing {
                tool: StrokeTool::Eraser,
                last: None,
            },
            (Some(Tool::Waypoint), _) => {
                InteractionState::PlacingWaypoint(PlacementPhase::AwaitingClick)
            }
        };
        self.set_state(next);
    }

    pub fn set_pen_size(&mut self, size: u32) {
        self.tools.pen_size = size.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE);
    }

    pub fn set_eraser_size(&mut self, size: u32) {
        self.tools.eraser_size = size.clamp(MIN_ERASER_SIZE, MAX_ERASER_SIZE);
    }

    pub fn set_waypoint_size(&mut self, size: u32) {
        self.tools.waypoint_size = size.max(1);
        self.invalidate();
    }

    fn to_pixel(&self, pos: DisplayPoint) -> Option<PixelPoint> {
        if !self.has_map() {
            return None;
        }
        self.transform.display_to_pixel(pos)
    }

    pub fn pointer_press(&mut self, pos: DisplayPoint, button: PointerButton, modifiers: Modifiers) {
        if button != PointerButton::Primary {
            return;
        }
        let Some(pixel) = self.to_pixel(pos) else {
            return;
        };

        match self.state {
            InteractionState::Drawing { tool, .. } => {
                self.paint_segment(tool, pixel, pixel);
                self.state = InteractionState::Drawing {
                    tool,
                    last: Some(pixel),
                };
            }
            InteractionState::PlacingWaypoint(PlacementPhase::AwaitingClick) => {
                let waypoint = self.add_waypoint(pixel, 0.0);
                self.state = InteractionState::PlacingWaypoint(PlacementPhase::SettingAngle {
                    number: waypoint.number(),
                    anchor: pos,
                });
            }
            InteractionState::EditingWaypoint { number, .. } => {
                let phase = if modifiers.shift {
                    EditPhase::SettingAngle { anchor: pos }
                } else {
                    self.set_waypoint_position(number, pixel);
                    EditPhase::MovingPosition
                };
                self.state = InteractionState::EditingWaypoint { number, phase };
            }
            InteractionState::Idle | InteractionState::PlacingWaypoint(_) => {}
        }
    }

    pub fn pointer_move(&mut self, pos: DisplayPoint) {
        let Some(pixel) = self.to_pixel(pos) else {
            return;
        };

        match self.state {
            InteractionState::Drawing {
                tool,
                last: Some(last),
            } => {
                self.paint_segment(tool, last, pixel);
                self.state = InteractionState::Drawing {
                    tool,
                    last: Some(pixel),
                };
            }
            InteractionState::PlacingWaypoint(PlacementPhase::SettingAngle { number, anchor }) => {
                self.set_waypoint_angle(number, heading(anchor, pos));
            }
            InteractionState::EditingWaypoint {
                number,
                phase: EditPhase::MovingPosition,
            } => {
                self.set_waypoint_position(number, pixel);
            }
            InteractionState::EditingWaypoint {
                number,
                phase: EditPhase::SettingAngle { anchor },
            } => {
                self.set_waypoint_angle(number, heading(anchor, pos));
            }
            _ => {}
        }
    }

    pub fn pointer_release(&mut self, pos: DisplayPoint) {
        if !self.has_map() {
            return;
        }

        match self.state {
            InteractionState::Drawing { tool, .. } => {
                self.state = InteractionState::Drawing { tool, last: None };
            }
            InteractionState::PlacingWaypoint(PlacementPhase::SettingAngle { number, anchor }) => {
                self.set_waypoint_angle(number, heading(anchor, pos));
                self.state = InteractionState::PlacingWaypoint(PlacementPhase::AwaitingClick);
            }
            InteractionState::EditingWaypoint { number, phase } => {
                if let EditPhase::SettingAngle { anchor } = phase {
                    self.set_waypoint_angle(number, heading(anchor, pos));
                }
                self.state = InteractionState::EditingWaypoint {
                    number,
                    phase: EditPhase::Idle,
                };
            }
            _ => {}
        }
    }

    /// Enters edit mode on the waypoint under the pointer (idle only), or leaves it.
    pub fn double_click(&mut self, pos: DisplayPoint) {
        let Some(pixel) = self.to_pixel(pos) else {
            return;
        };

        match self.state {
            InteractionState::EditingWaypoint { .. } => {
                self.set_state(InteractionState::Idle);
            }
            InteractionState::Idle => {
                if let Some(number) = self.waypoint_at(pixel) {
                    self.set_state(InteractionState::EditingWaypoint {
                        number,
                        phase: EditPhase::Idle,
                    });
                    self.emit(DocumentEvent::StatusMessage {
                        text: format!(
                            "Editing waypoint {}: drag to move, Shift+drag to rotate, double-click to finish",
                            number
                        ),
                        timeout: Duration::from_millis(STATUS_MESSAGE_TIMEOUT_MS),
                    });
                }
            }
            _ => {}
        }
    }

    fn paint_segment(&mut self, tool: StrokeTool, from: PixelPoint, to: PixelPoint) {
        let size = match tool {
            StrokeTool::Pen => self.tools.pen_size,
            StrokeTool::Eraser => self.tools.eraser_size,
        };
        let width = stroke_width(size, self.transform.scale_factor());
        let Some(raster) = self.layers.get_mut(LayerKind::Drawing).raster_mut() else {
            return;
        };
        markers::draw_stroke(raster, from, to, tool, width);
        self.is_modified = true;
        self.invalidate();
    }
}
