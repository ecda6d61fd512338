//! Transform controller: drag, resize, and rotate gestures on one item.
//!
//! While a handle is held the item is previewed through a [`LiveTransform`]:
//! the committed width/height plus a transient scale. Releasing the pointer
//! commits the preview through [`Scene::update_furniture`] with the scale
//! folded back into width/height, so every gesture starts from scale 1 and
//! repeated resizes never compound.
//!
//! A resize candidate smaller than [`MIN_ITEM_SIZE`] on either axis is
//! rejected; the preview keeps the last accepted geometry and the gesture
//! carries on from there.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::MIN_ITEM_SIZE;
use crate::geom::{Point, Size, rotate_vec};
use crate::hit::{HitPart, ResizeAnchor};
use crate::input::InputState;
use crate::scene::{FurnitureItem, FurniturePatch, ItemId, Scene};

/// Geometry of an item while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveTransform {
    pub x: f64,
    pub y: f64,
    /// Committed width the gesture started from.
    pub base_width: f64,
    /// Committed height the gesture started from.
    pub base_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl LiveTransform {
    #[must_use]
    pub fn from_item(item: &FurnitureItem) -> Self {
        Self {
            x: item.x,
            y: item.y,
            base_width: item.width,
            base_height: item.height,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: item.rotation,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Effective width: base width times the transient scale.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.base_width * self.scale_x
    }

    /// Effective height: base height times the transient scale.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.base_height * self.scale_y
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[must_use]
    pub fn local_to_world(&self, local: Point) -> Point {
        self.position() + rotate_vec(local, self.rotation)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.local_to_world(Point::new(self.width() * 0.5, self.height() * 0.5))
    }

    /// Whether the effective box satisfies the minimum-size rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w.is_finite() && h.is_finite() && w >= MIN_ITEM_SIZE && h >= MIN_ITEM_SIZE
    }

    /// Fold the transient scale into the base size, leaving scale at 1.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            base_width: self.width(),
            base_height: self.height(),
            scale_x: 1.0,
            scale_y: 1.0,
            ..*self
        }
    }

    /// A full-geometry patch with the scale already baked in.
    #[must_use]
    pub fn to_patch(&self) -> FurniturePatch {
        let n = self.normalized();
        FurniturePatch::geometry(n.position(), Size::new(n.base_width, n.base_height), n.rotation)
    }

    /// A copy of `item` showing this geometry, for drawing previews.
    #[must_use]
    pub fn apply_to(&self, item: &FurnitureItem) -> FurnitureItem {
        FurnitureItem {
            x: self.x,
            y: self.y,
            width: self.width(),
            height: self.height(),
            rotation: self.rotation,
            ..item.clone()
        }
    }
}

/// Start the gesture that matches the part of `item` under the pointer.
#[must_use]
pub fn begin(item: &FurnitureItem, part: HitPart, pointer: Point) -> InputState {
    let orig = LiveTransform::from_item(item);
    match part {
        HitPart::Body => InputState::DraggingItem { id: item.id, start: pointer, orig, live: orig },
        HitPart::ResizeHandle(anchor) => InputState::ResizingItem { id: item.id, anchor, start: pointer, orig, live: orig },
        HitPart::RotateHandle => InputState::RotatingItem { id: item.id, center: orig.center(), orig, live: orig },
    }
}

/// Advance the active gesture to `pointer`. Returns `true` when the preview changed.
pub fn update(state: &mut InputState, pointer: Point) -> bool {
    match state {
        InputState::Idle => false,
        InputState::DraggingItem { start, orig, live, .. } => {
            let next = drag_candidate(orig, *start, pointer);
            replace_if_changed(live, next)
        }
        InputState::ResizingItem { anchor, start, orig, live, .. } => {
            let next = bound_box(*live, resize_candidate(orig, *anchor, *start, pointer));
            replace_if_changed(live, next)
        }
        InputState::RotatingItem { center, orig, live, .. } => {
            let next = rotate_candidate(orig, *center, pointer);
            replace_if_changed(live, next)
        }
    }
}

/// Finish the gesture and write its geometry into the scene.
///
/// Returns the committed patch, or `None` when nothing moved or the item is
/// gone. A drag commits position only.
pub fn commit(state: InputState, scene: &mut Scene) -> Option<(ItemId, FurniturePatch)> {
    let (id, orig, live, position_only) = match state {
        InputState::Idle => return None,
        InputState::DraggingItem { id, orig, live, .. } => (id, orig, live, true),
        InputState::ResizingItem { id, orig, live, .. } | InputState::RotatingItem { id, orig, live, .. } => {
            (id, orig, live, false)
        }
    };
    if live == orig {
        return None;
    }

    let patch = if position_only { FurniturePatch::position(live.position()) } else { live.to_patch() };
    if scene.update_furniture(&id, &patch) {
        tracing::debug!(%id, ?patch, "transform committed");
        Some((id, patch))
    } else {
        None
    }
}

/// Position after dragging the pointer from `start` to `pointer`.
#[must_use]
pub fn drag_candidate(orig: &LiveTransform, start: Point, pointer: Point) -> LiveTransform {
    let moved = orig.position() + (pointer - start);
    LiveTransform { x: moved.x, y: moved.y, ..*orig }
}

/// Candidate geometry for a resize handle drag, expressed as a transient scale.
///
/// The pointer delta is measured in the item's rotated frame, so edges move
/// along the item's own axes. Dragging a left/top edge also shifts the origin.
#[must_use]
pub fn resize_candidate(orig: &LiveTransform, anchor: ResizeAnchor, start: Point, pointer: Point) -> LiveTransform {
    let d = rotate_vec(pointer - start, -orig.rotation);
    let (ex, ey) = anchor.edges();
    let (w, shift_x) = stretch(orig.width(), d.x, ex);
    let (h, shift_y) = stretch(orig.height(), d.y, ey);
    let origin = orig.position() + rotate_vec(Point::new(shift_x, shift_y), orig.rotation);

    LiveTransform {
        x: origin.x,
        y: origin.y,
        scale_x: w / orig.base_width,
        scale_y: h / orig.base_height,
        ..*orig
    }
}

/// Keep `old` when `candidate` is below the minimum size.
#[must_use]
pub fn bound_box(old: LiveTransform, candidate: LiveTransform) -> LiveTransform {
    if candidate.is_valid() { candidate } else { old }
}

/// Candidate geometry for a rotate handle drag.
///
/// The handle points "up" at 0°, so the angle is the pointer bearing from the
/// center plus 90°. The origin moves so the center stays put.
#[must_use]
pub fn rotate_candidate(orig: &LiveTransform, center: Point, pointer: Point) -> LiveTransform {
    let rotation = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    let half = Point::new(orig.width() * 0.5, orig.height() * 0.5);
    let origin = center - rotate_vec(half, rotation);
    LiveTransform { x: origin.x, y: origin.y, rotation, ..*orig }
}

fn stretch(len: f64, delta: f64, edge: i8) -> (f64, f64) {
    match edge {
        1 => (len + delta, 0.0),
        -1 => (len - delta, delta),
        _ => (len, 0.0),
    }
}

fn replace_if_changed(live: &mut LiveTransform, next: LiveTransform) -> bool {
    if *live == next {
        return false;
    }
    *live = next;
    true
}
