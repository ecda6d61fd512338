#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::geom::{Point, is_near_point};
use crate::scene::{FurnitureItem, ItemId, Scene};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Handle order used for drawing and hit-testing; `N` comes first.
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// Which edges the handle drags: `-1` the left/top edge, `1` the
    /// right/bottom edge, `0` neither.
    #[must_use]
    pub fn edges(self) -> (i8, i8) {
        match self {
            Self::N => (0, -1),
            Self::Ne => (1, -1),
            Self::E => (1, 0),
            Self::Se => (1, 1),
            Self::S => (0, 1),
            Self::Sw => (-1, 1),
            Self::W => (-1, 0),
            Self::Nw => (-1, -1),
        }
    }

    /// Handle position in the item's local frame for a `width` x `height` box.
    #[must_use]
    pub fn local_position(self, width: f64, height: f64) -> Point {
        let (ex, ey) = self.edges();
        let along = |edge: i8, len: f64| match edge {
            -1 => 0.0,
            0 => len * 0.5,
            _ => len,
        };
        Point::new(along(ex, width), along(ey, height))
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Workspace positions of the eight resize handles, in [`ResizeAnchor::ALL`] order.
#[must_use]
pub fn resize_handle_positions(item: &FurnitureItem) -> [Point; 8] {
    ResizeAnchor::ALL.map(|a| item.local_to_world(a.local_position(item.width, item.height)))
}

/// Workspace position of the rotate handle, above the middle of the top edge.
#[must_use]
pub fn rotate_handle_position(item: &FurnitureItem) -> Point {
    item.local_to_world(Point::new(item.width * 0.5, -ROTATE_HANDLE_OFFSET_PX))
}

/// Test which item (if any) is under `pt`, checking the selected item's handles first.
///
/// Bodies are tested topmost first, so the last-added item wins where items overlap.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene, selected_id: Option<ItemId>) -> Option<Hit> {
    if let Some(item) = selected_id.as_ref().and_then(|id| scene.item(id)) {
        if let Some(part) = handle_at(pt, item) {
            return Some(Hit { item_id: item.id, part });
        }
    }

    scene
        .furniture()
        .iter()
        .rev()
        .find(|item| item.contains(pt))
        .map(|item| Hit { item_id: item.id, part: HitPart::Body })
}

fn handle_at(pt: Point, item: &FurnitureItem) -> Option<HitPart> {
    if is_near_point(pt, rotate_handle_position(item), HANDLE_RADIUS_PX) {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .iter()
        .zip(resize_handle_positions(item))
        .find(|(_, pos)| is_near_point(pt, *pos, HANDLE_RADIUS_PX))
        .map(|(anchor, _)| HitPart::ResizeHandle(*anchor))
}
