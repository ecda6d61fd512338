#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn sofa() -> ImageRef {
    ImageRef::new("/assets/furniture/sofa.png")
}

fn room() -> ImageRef {
    ImageRef::new("blob:room-1")
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// A scene with a background, two items, one wall, and a draft.
fn busy_scene() -> (Scene, ItemId, ItemId) {
    let mut scene = Scene::new();
    scene.set_background(room());
    let a = scene.add_furniture(sofa());
    let b = scene.add_furniture(ImageRef::new("/assets/furniture/lamp.png"));
    for p in [pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)] {
        scene.push_draft_point(p);
    }
    scene.close_draft();
    scene.push_draft_point(pt(5.0, 5.0));
    scene.select(Some(a));
    (scene, a, b)
}

// =============================================================
// Color
// =============================================================

#[test]
fn color_parses_long_hex() {
    let c = Color::from_hex("#E53E3E").unwrap();
    assert_eq!(c, Color::rgb(0xE5, 0x3E, 0x3E));
}

#[test]
fn color_parses_short_hex_and_no_hash() {
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
    assert_eq!(Color::from_hex("4299e1").unwrap(), Color::rgb(0x42, 0x99, 0xE1));
}

#[test]
fn color_rejects_garbage() {
    for raw in ["", "#12", "#12345", "#GGGGGG", "#1234567", "#ééé"] {
        assert!(matches!(Color::from_hex(raw), Err(WorkspaceError::InvalidColor(_))), "{raw}");
    }
}

#[test]
fn color_serde_uses_hex_string() {
    let json = serde_json::to_string(&Color::rgb(0x4F, 0x58, 0x63)).unwrap();
    assert_eq!(json, "\"#4F5863\"");
    let back: Color = serde_json::from_str("\"#4f5863\"").unwrap();
    assert_eq!(back, Color::rgb(0x4F, 0x58, 0x63));
    assert!(serde_json::from_str::<Color>("\"navy\"").is_err());
}

// =============================================================
// Mode serde
// =============================================================

#[test]
fn mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Select).unwrap(), "\"select\"");
    assert_eq!(serde_json::to_string(&Mode::Paint).unwrap(), "\"paint\"");
}

// =============================================================
// FurnitureItem geometry
// =============================================================

#[test]
fn new_item_has_defaults() {
    let item = FurnitureItem::new(sofa());
    assert_eq!((item.x, item.y), (50.0, 50.0));
    assert_eq!((item.width, item.height), (150.0, 150.0));
    assert_eq!(item.rotation, 0.0);
    assert!(!item.flipped);
}

#[test]
fn center_of_unrotated_item() {
    let item = FurnitureItem::new(sofa());
    assert_eq!(item.center(), pt(125.0, 125.0));
}

#[test]
fn rotated_item_pivots_on_top_left() {
    let mut item = FurnitureItem::new(sofa());
    item.x = 0.0;
    item.y = 0.0;
    item.width = 100.0;
    item.height = 50.0;
    item.rotation = 90.0;
    // Local +x now points down the screen.
    let p = item.local_to_world(pt(100.0, 0.0));
    assert!((p.x - 0.0).abs() < 1e-9);
    assert!((p.y - 100.0).abs() < 1e-9);
    assert!(item.contains(pt(-25.0, 50.0)));
    assert!(!item.contains(pt(25.0, 50.0)));
}

#[test]
fn world_to_local_inverts_local_to_world() {
    let mut item = FurnitureItem::new(sofa());
    item.rotation = 33.0;
    let local = pt(12.0, 80.0);
    let back = item.world_to_local(item.local_to_world(local));
    assert!((back.x - local.x).abs() < 1e-9);
    assert!((back.y - local.y).abs() < 1e-9);
}

// =============================================================
// Background
// =============================================================

#[test]
fn set_background_resets_everything() {
    let (mut scene, _, _) = busy_scene();
    scene.set_background(ImageRef::new("blob:room-2"));
    assert_eq!(scene.background(), Some(&ImageRef::new("blob:room-2")));
    assert!(scene.furniture().is_empty());
    assert!(scene.walls().is_empty());
    assert!(scene.draft().is_empty());
    assert!(scene.selected().is_none());
}

// =============================================================
// add / update
// =============================================================

#[test]
fn add_furniture_appends_in_z_order() {
    let mut scene = Scene::new();
    let a = scene.add_furniture(sofa());
    let b = scene.add_furniture(sofa());
    assert_ne!(a, b);
    let ids: Vec<_> = scene.furniture().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn update_merges_partial_fields() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    assert!(scene.update_furniture(&id, &FurniturePatch { x: Some(5.0), rotation: Some(45.0), ..Default::default() }));
    let item = scene.item(&id).unwrap();
    assert_eq!(item.x, 5.0);
    assert_eq!(item.y, 50.0);
    assert_eq!(item.rotation, 45.0);
    assert_eq!(item.width, 150.0);
}

#[test]
fn update_unknown_id_is_noop() {
    let mut scene = Scene::new();
    scene.add_furniture(sofa());
    let before = scene.clone();
    assert!(!scene.update_furniture(&Uuid::new_v4(), &FurniturePatch::position(pt(1.0, 1.0))));
    assert_eq!(scene, before);
}

#[test]
fn update_rejects_undersized_geometry_whole() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    let patch = FurniturePatch { x: Some(0.0), width: Some(9.99), height: Some(40.0), ..Default::default() };
    assert!(!scene.update_furniture(&id, &patch));
    let item = scene.item(&id).unwrap();
    assert_eq!((item.x, item.width, item.height), (50.0, 150.0, 150.0));
}

#[test]
fn update_accepts_exact_minimum() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    assert!(scene.update_furniture(&id, &FurniturePatch { width: Some(10.0), height: Some(10.0), ..Default::default() }));
    assert_eq!(scene.item(&id).unwrap().size(), Size::new(10.0, 10.0));
}

#[test]
fn update_rejects_non_finite_size() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    assert!(!scene.update_furniture(&id, &FurniturePatch { height: Some(f64::NAN), ..Default::default() }));
}

#[test]
fn update_never_touches_flip() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    scene.select(Some(id));
    scene.flip_selected();
    scene.update_furniture(&id, &FurniturePatch::geometry(pt(0.0, 0.0), Size::new(80.0, 60.0), 10.0));
    assert!(scene.item(&id).unwrap().flipped);
}

// =============================================================
// Flip
// =============================================================

#[test]
fn flip_twice_restores() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    scene.select(Some(id));
    assert!(scene.flip_selected());
    assert!(scene.item(&id).unwrap().flipped);
    assert!(scene.flip_selected());
    assert!(!scene.item(&id).unwrap().flipped);
}

#[test]
fn flip_without_selection_is_noop() {
    let mut scene = Scene::new();
    let id = scene.add_furniture(sofa());
    assert!(!scene.flip_selected());
    assert!(!scene.item(&id).unwrap().flipped);
}

#[test]
fn flip_only_affects_selected() {
    let (mut scene, a, b) = busy_scene();
    scene.flip_selected();
    assert!(scene.item(&a).unwrap().flipped);
    assert!(!scene.item(&b).unwrap().flipped);
}

// =============================================================
// Select / delete
// =============================================================

#[test]
fn select_unknown_id_deselects() {
    let (mut scene, _, _) = busy_scene();
    scene.select(Some(Uuid::new_v4()));
    assert!(scene.selected().is_none());
}

#[test]
fn delete_selected_removes_and_clears_selection() {
    let (mut scene, a, b) = busy_scene();
    assert_eq!(scene.delete_selected(), Some(a));
    assert!(scene.selected().is_none());
    assert!(scene.item(&a).is_none());
    assert!(scene.item(&b).is_some());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut scene = Scene::new();
    scene.add_furniture(sofa());
    assert_eq!(scene.delete_selected(), None);
    assert_eq!(scene.furniture().len(), 1);
}

// =============================================================
// Mode / paint
// =============================================================

#[test]
fn mode_switch_clears_selection() {
    let (mut scene, _, _) = busy_scene();
    scene.set_mode(Mode::Paint);
    assert!(scene.selected().is_none());
    scene.set_mode(Mode::Select);
    assert!(scene.selected().is_none());
}

#[test]
fn mode_switch_keeps_draft() {
    let (mut scene, _, _) = busy_scene();
    scene.set_mode(Mode::Paint);
    scene.set_mode(Mode::Select);
    assert_eq!(scene.draft(), &[pt(5.0, 5.0)]);
}

#[test]
fn close_draft_requires_three_points() {
    let mut scene = Scene::new();
    scene.push_draft_point(pt(0.0, 0.0));
    scene.push_draft_point(pt(1.0, 0.0));
    assert!(scene.close_draft().is_none());
    assert_eq!(scene.draft().len(), 2);
}

#[test]
fn close_draft_uses_active_color() {
    let mut scene = Scene::new();
    let navy = Color::rgb(0x4F, 0x58, 0x63);
    scene.set_paint_color(navy);
    for p in [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)] {
        scene.push_draft_point(p);
    }
    let id = scene.close_draft().unwrap();
    assert_eq!(scene.walls()[0].id, id);
    assert_eq!(scene.walls()[0].color, navy);
    assert_eq!(scene.walls()[0].opacity(), 0.5);
    assert!(scene.draft().is_empty());
}

#[test]
fn clear_points_keeps_walls() {
    let (mut scene, _, _) = busy_scene();
    scene.clear_points();
    assert!(scene.draft().is_empty());
    assert_eq!(scene.walls().len(), 1);
}

#[test]
fn clear_paint_empties_walls_and_draft() {
    let (mut scene, _, _) = busy_scene();
    scene.clear_paint();
    assert!(scene.walls().is_empty());
    assert!(scene.draft().is_empty());
    assert_eq!(scene.furniture().len(), 2);
}

// =============================================================
// clear_scene
// =============================================================

#[test]
fn clear_scene_keep_background() {
    let (mut scene, _, _) = busy_scene();
    scene.clear_scene(true);
    assert_eq!(scene.background(), Some(&room()));
    assert!(scene.furniture().is_empty());
    assert!(scene.walls().is_empty());
    assert!(scene.draft().is_empty());
    assert!(scene.selected().is_none());
}

#[test]
fn clear_scene_drop_background() {
    let (mut scene, _, _) = busy_scene();
    scene.clear_scene(false);
    assert!(scene.background().is_none());
}
