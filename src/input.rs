//! Input model: mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each gesture carries the live geometry the renderer previews
//! and that is committed to the scene on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::hit::ResizeAnchor;
use crate::scene::ItemId;
use crate::transform::LiveTransform;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `Delete` or `Backspace`.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an item across the stage.
    DraggingItem {
        id: ItemId,
        /// Pointer position at pointer-down.
        start: Point,
        /// Geometry when the drag began.
        orig: LiveTransform,
        /// Geometry shown right now.
        live: LiveTransform,
    },
    /// Dragging one of the eight resize handles.
    ResizingItem {
        id: ItemId,
        anchor: ResizeAnchor,
        /// Pointer position at pointer-down.
        start: Point,
        orig: LiveTransform,
        /// Last accepted candidate; rejected candidates leave it alone.
        live: LiveTransform,
    },
    /// Dragging the rotate handle.
    RotatingItem {
        id: ItemId,
        /// Box center; the pivot for the whole gesture.
        center: Point,
        orig: LiveTransform,
        live: LiveTransform,
    },
}

impl InputState {
    /// The item being transformed and its previewed geometry, if any.
    #[must_use]
    pub fn preview(&self) -> Option<(ItemId, &LiveTransform)> {
        match self {
            Self::Idle => None,
            Self::DraggingItem { id, live, .. }
            | Self::ResizingItem { id, live, .. }
            | Self::RotatingItem { id, live, .. } => Some((*id, live)),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
