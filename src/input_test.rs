use super::*;
use crate::hit::HitPart;
use crate::scene::{FurnitureItem, ImageRef};
use crate::transform;

fn item() -> FurnitureItem {
    FurnitureItem::new(ImageRef::new("/assets/furniture/sofa.png"))
}

// =============================================================
// Key
// =============================================================

#[test]
fn delete_and_backspace_are_delete() {
    assert!(Key::new("Delete").is_delete());
    assert!(Key::new("Backspace").is_delete());
    assert!(!Key::new("d").is_delete());
    assert!(!Key::new("Escape").is_delete());
}

#[test]
fn escape_is_escape() {
    assert!(Key::new("Escape").is_escape());
    assert!(!Key::new("Esc").is_escape());
}

// =============================================================
// InputState
// =============================================================

#[test]
fn default_is_idle_without_preview() {
    let state = InputState::default();
    assert!(state.is_idle());
    assert!(state.preview().is_none());
}

#[test]
fn gestures_expose_preview() {
    let item = item();
    for part in [HitPart::Body, HitPart::RotateHandle, HitPart::ResizeHandle(ResizeAnchor::Se)] {
        let state = transform::begin(&item, part, Point::new(60.0, 60.0));
        assert!(!state.is_idle());
        let (id, live) = state.preview().expect("preview");
        assert_eq!(id, item.id);
        assert_eq!(live.size(), item.size());
    }
}
