//! Interaction state machine types.
//!
//! ```text
//! Idle ──select pen/eraser──▶ Drawing(tool) ──same tool / none──▶ Idle
//! Idle ──select waypoint──▶ PlacingWaypoint(AwaitingClick)
//!        press ─▶ SettingAngle ─ move: heading ─ release ─▶ AwaitingClick
//! Idle ──double-click on waypoint──▶ EditingWaypoint(Idle)
//!        press ─▶ MovingPosition   shift+press ─▶ SettingAngle
//!        release ─▶ Idle           double-click ─▶ leaves edit mode
//! ```

use std::fmt;

use wayedit_core::{DisplayPoint, PixelPoint};

use crate::markers::StrokeTool;

/// Tools a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Pen,
    Eraser,
    Waypoint,
}

impl Tool {
    /// Maps the numeric tool ids used by toolbars (0 = none).
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Pen),
            2 => Some(Self::Eraser),
            3 => Some(Self::Waypoint),
            _ => None,
        }
    }
}

/// Coarse mode reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolMode {
    Idle,
    Pen,
    Eraser,
    PlaceWaypoint,
    EditWaypoint(u32),
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "None"),
            Self::Pen => write!(f, "Pen"),
            Self::Eraser => write!(f, "Eraser"),
            Self::PlaceWaypoint => write!(f, "Waypoint"),
            Self::EditWaypoint(n) => write!(f, "Editing waypoint {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementPhase {
    AwaitingClick,
    /// The waypoint exists; dragging sets its heading relative to `anchor`.
    SettingAngle { number: u32, anchor: DisplayPoint },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditPhase {
    Idle,
    MovingPosition,
    SettingAngle { anchor: DisplayPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing {
        tool: StrokeTool,
        /// Last painted pixel while the button is held.
        last: Option<PixelPoint>,
    },
    PlacingWaypoint(PlacementPhase),
    EditingWaypoint {
        number: u32,
        phase: EditPhase,
    },
}

impl InteractionState {
    pub fn mode(&self) -> ToolMode {
        match self {
            Self::Idle => ToolMode::Idle,
            Self::Drawing {
                tool: StrokeTool::Pen,
                ..
            } => ToolMode::Pen,
            Self::Drawing {
                tool: StrokeTool::Eraser,
                ..
            } => ToolMode::Eraser,
            Self::PlacingWaypoint(_) => ToolMode::PlaceWaypoint,
            Self::EditingWaypoint { number, .. } => ToolMode::EditWaypoint(*number),
        }
    }

    /// Number of the waypoint in edit mode, if any.
    pub fn editing(&self) -> Option<u32> {
        match self {
            Self::EditingWaypoint { number, .. } => Some(*number),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// Heading from `anchor` toward `pos` in display space, y up.
pub fn heading(anchor: DisplayPoint, pos: DisplayPoint) -> f64 {
    let dx = pos.x - anchor.x;
    let dy = -(pos.y - anchor.y);
    dy.atan2(dx)
}
