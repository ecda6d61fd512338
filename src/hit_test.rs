#![allow(clippy::float_cmp)]

use super::*;
use crate::scene::{FurniturePatch, ImageRef};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Scene with one 100x80 item at the origin.
fn scene_with_item() -> (Scene, ItemId) {
    let mut scene = Scene::new();
    let id = scene.add_furniture(ImageRef::new("chair"));
    scene.update_furniture(&id, &FurniturePatch::geometry(pt(0.0, 0.0), crate::geom::Size::new(100.0, 80.0), 0.0));
    (scene, id)
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_order_starts_with_north() {
    assert_eq!(ResizeAnchor::ALL[0], ResizeAnchor::N);
    assert_eq!(ResizeAnchor::ALL.len(), 8);
}

#[test]
fn anchor_local_positions() {
    assert_eq!(ResizeAnchor::N.local_position(100.0, 80.0), pt(50.0, 0.0));
    assert_eq!(ResizeAnchor::Se.local_position(100.0, 80.0), pt(100.0, 80.0));
    assert_eq!(ResizeAnchor::W.local_position(100.0, 80.0), pt(0.0, 40.0));
    assert_eq!(ResizeAnchor::Nw.local_position(100.0, 80.0), pt(0.0, 0.0));
}

#[test]
fn anchor_edges_are_opposite_pairs() {
    for (a, b) in [
        (ResizeAnchor::N, ResizeAnchor::S),
        (ResizeAnchor::E, ResizeAnchor::W),
        (ResizeAnchor::Ne, ResizeAnchor::Sw),
        (ResizeAnchor::Se, ResizeAnchor::Nw),
    ] {
        let (ax, ay) = a.edges();
        let (bx, by) = b.edges();
        assert_eq!((ax, ay), (-bx, -by));
    }
}

// =============================================================
// Handle positions
// =============================================================

#[test]
fn rotate_handle_sits_above_top_edge() {
    let (scene, id) = scene_with_item();
    let item = scene.item(&id).unwrap();
    assert_eq!(rotate_handle_position(item), pt(50.0, -24.0));
}

#[test]
fn handles_follow_rotation() {
    let (mut scene, id) = scene_with_item();
    scene.update_furniture(&id, &FurniturePatch { rotation: Some(90.0), ..Default::default() });
    let item = scene.item(&id).unwrap();
    let se = resize_handle_positions(item)[3];
    // Local (100, 80) rotated 90° clockwise is (-80, 100).
    assert!((se.x + 80.0).abs() < 1e-9);
    assert!((se.y - 100.0).abs() < 1e-9);
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn miss_returns_none() {
    let (scene, _) = scene_with_item();
    assert!(hit_test(pt(500.0, 500.0), &scene, None).is_none());
}

#[test]
fn body_hit() {
    let (scene, id) = scene_with_item();
    let hit = hit_test(pt(50.0, 40.0), &scene, None).unwrap();
    assert_eq!(hit.item_id, id);
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn handles_only_for_selected_item() {
    let (scene, id) = scene_with_item();
    let unselected = hit_test(pt(100.0, 80.0), &scene, None).unwrap();
    assert_eq!(unselected.part, HitPart::Body);

    let selected = hit_test(pt(100.0, 80.0), &scene, Some(id)).unwrap();
    assert_eq!(selected.part, HitPart::ResizeHandle(ResizeAnchor::Se));
}

#[test]
fn handle_hit_has_slop_outside_the_box() {
    let (scene, id) = scene_with_item();
    let hit = hit_test(pt(105.0, 85.0), &scene, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Se));
}

#[test]
fn rotate_handle_hit() {
    let (scene, id) = scene_with_item();
    let hit = hit_test(pt(50.0, -24.0), &scene, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn topmost_item_wins() {
    let (mut scene, bottom) = scene_with_item();
    let top = scene.add_furniture(ImageRef::new("rug"));
    scene.update_furniture(&top, &FurniturePatch::position(pt(0.0, 0.0)));
    let hit = hit_test(pt(20.0, 20.0), &scene, None).unwrap();
    assert_eq!(hit.item_id, top);
    assert_ne!(hit.item_id, bottom);
}

#[test]
fn stale_selected_id_is_ignored() {
    let (scene, _) = scene_with_item();
    let hit = hit_test(pt(50.0, -24.0), &scene, Some(uuid::Uuid::new_v4()));
    assert!(hit.is_none());
}
