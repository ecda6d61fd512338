//! Polygon drawing: click-to-place wall outlines with closure detection.
//!
//! The draft lives in the [`Scene`]; this module only decides what a click
//! means. With more than two points placed, a click within the closing radius
//! of the first point finishes the polygon (the click itself is not added).
//! Any other click appends a point.

#[cfg(test)]
#[path = "polygon_test.rs"]
mod polygon_test;

use crate::geom::{Point, is_near_point};
use crate::scene::{PolygonId, Scene};

/// Where the draft stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Collecting(usize),
}

/// What a paint click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonEvent {
    /// The click was appended; `count` is the new draft length.
    PointAdded { count: usize },
    /// The draft became a wall polygon and was reset.
    Closed(PolygonId),
}

#[must_use]
pub fn draft_state(scene: &Scene) -> DraftState {
    match scene.draft().len() {
        0 => DraftState::Empty,
        n => DraftState::Collecting(n),
    }
}

/// Whether clicking `p` would close `draft`.
#[must_use]
pub fn closes(draft: &[Point], p: Point, radius: f64) -> bool {
    match draft.first() {
        Some(first) if draft.len() > 2 => is_near_point(p, *first, radius),
        _ => false,
    }
}

/// Handle one paint click at `p`.
pub fn click(scene: &mut Scene, p: Point, radius: f64) -> PolygonEvent {
    if closes(scene.draft(), p, radius) {
        if let Some(id) = scene.close_draft() {
            return PolygonEvent::Closed(id);
        }
    }
    scene.push_draft_point(p);
    tracing::trace!(x = p.x, y = p.y, count = scene.draft().len(), "draft point added");
    PolygonEvent::PointAdded { count: scene.draft().len() }
}
