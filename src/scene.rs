//! Scene model: furniture, wall paint, the draft polygon, and selection.
//!
//! This module defines the data that describes what is in the room
//! (`FurnitureItem`, `WallPolygon`), a sparse-update type for geometry edits
//! (`FurniturePatch`), and the `Scene` that exclusively owns all of it.
//!
//! Every public mutation keeps the scene invariants intact: the selection is
//! either empty or names an existing item, and no committed item is smaller
//! than [`MIN_ITEM_SIZE`] on either axis. Requests naming unknown ids are
//! no-ops. Other components read the scene and ask it to change; none of them
//! keep their own copy of furniture or polygon data.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::consts::{DEFAULT_ITEM_POSITION, DEFAULT_ITEM_SIZE, MIN_ITEM_SIZE, WALL_OPACITY};
use crate::error::WorkspaceError;
use crate::geom::{Point, Size, rotate_vec};

/// Unique identifier for a furniture item.
pub type ItemId = Uuid;

/// Unique identifier for a wall polygon.
pub type PolygonId = Uuid;

/// Opaque handle to an image (a sprite path, an object URL, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque RGB color, written as `#RRGGBB` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidColor`] for anything else.
    pub fn from_hex(raw: &str) -> Result<Self, WorkspaceError> {
        let invalid = || WorkspaceError::InvalidColor(raw.to_owned());
        let digits = raw.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

/// Which tool the pointer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Pick, move, resize, and rotate furniture (default).
    #[default]
    Select,
    /// Trace wall polygons point by point.
    Paint,
}

/// A furniture sprite placed over the room photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    /// Stable identifier for the item's lifetime.
    pub id: ItemId,
    /// Sprite to draw.
    pub image: ImageRef,
    /// Left edge of the unrotated box; also the rotation origin.
    pub x: f64,
    /// Top edge of the unrotated box; also the rotation origin.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around `(x, y)`. Any value; normalize for display.
    pub rotation: f64,
    /// Mirror the sprite horizontally inside its box.
    pub flipped: bool,
}

impl FurnitureItem {
    /// A new item with the default size and position.
    #[must_use]
    pub fn new(image: ImageRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            x: DEFAULT_ITEM_POSITION,
            y: DEFAULT_ITEM_POSITION,
            width: DEFAULT_ITEM_SIZE,
            height: DEFAULT_ITEM_SIZE,
            rotation: 0.0,
            flipped: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Map a point in the item's unrotated local frame to workspace space.
    #[must_use]
    pub fn local_to_world(&self, local: Point) -> Point {
        self.position() + rotate_vec(local, self.rotation)
    }

    /// Map a workspace point into the item's unrotated local frame.
    #[must_use]
    pub fn world_to_local(&self, world: Point) -> Point {
        rotate_vec(world - self.position(), -self.rotation)
    }

    /// Center of the box in workspace space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.local_to_world(Point::new(self.width * 0.5, self.height * 0.5))
    }

    /// Whether `world` falls inside the (rotated) box.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        let local = self.world_to_local(world);
        (0.0..=self.width).contains(&local.x) && (0.0..=self.height).contains(&local.y)
    }
}

/// Sparse geometry update for a furniture item. Only present fields are applied.
///
/// Flip state is not patchable; see [`Scene::flip_selected`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FurniturePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl FurniturePatch {
    /// A patch that moves the item only.
    #[must_use]
    pub fn position(p: Point) -> Self {
        Self { x: Some(p.x), y: Some(p.y), ..Default::default() }
    }

    /// A patch carrying a full geometry.
    #[must_use]
    pub fn geometry(position: Point, size: Size, rotation: f64) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            width: Some(size.width),
            height: Some(size.height),
            rotation: Some(rotation),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A painted wall region. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPolygon {
    pub id: PolygonId,
    /// Vertices in click order; the outline closes back to the first one.
    pub points: Vec<Point>,
    pub color: Color,
}

impl WallPolygon {
    /// Fill opacity; fixed for every wall.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        WALL_OPACITY
    }
}

/// The full editable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    background: Option<ImageRef>,
    /// Insertion order is z-order (later = on top).
    furniture: Vec<FurnitureItem>,
    /// Insertion order is paint stacking order.
    walls: Vec<WallPolygon>,
    /// Points of the polygon being traced.
    draft: Vec<Point>,
    selected: Option<ItemId>,
    mode: Mode,
    paint_color: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: None,
            furniture: Vec::new(),
            walls: Vec::new(),
            draft: Vec::new(),
            selected: None,
            mode: Mode::Select,
            paint_color: catalog::default_paint_color(),
        }
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn background(&self) -> Option<&ImageRef> {
        self.background.as_ref()
    }

    #[must_use]
    pub fn furniture(&self) -> &[FurnitureItem] {
        &self.furniture
    }

    #[must_use]
    pub fn walls(&self) -> &[WallPolygon] {
        &self.walls
    }

    #[must_use]
    pub fn draft(&self) -> &[Point] {
        &self.draft
    }

    #[must_use]
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn paint_color(&self) -> Color {
        self.paint_color
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&FurnitureItem> {
        self.furniture.iter().find(|f| f.id == *id)
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&FurnitureItem> {
        self.selected.as_ref().and_then(|id| self.item(id))
    }

    // --- Background ---

    /// Replace the background. A new photo always starts an empty room.
    pub fn set_background(&mut self, image: ImageRef) {
        tracing::debug!(image = %image, "background replaced; resetting scene");
        self.clear_scene(false);
        self.background = Some(image);
    }

    // --- Furniture ---

    /// Append a new item with default geometry and return its id.
    pub fn add_furniture(&mut self, image: ImageRef) -> ItemId {
        let item = FurnitureItem::new(image);
        let id = item.id;
        tracing::debug!(%id, image = %item.image, "furniture added");
        self.furniture.push(item);
        id
    }

    /// Merge a geometry patch into the item with `id`.
    ///
    /// Returns `false` (and changes nothing) if the id is unknown or the patch
    /// would leave the item smaller than the minimum size.
    pub fn update_furniture(&mut self, id: &ItemId, patch: &FurniturePatch) -> bool {
        let Some(item) = self.furniture.iter_mut().find(|f| f.id == *id) else {
            return false;
        };

        let width = patch.width.unwrap_or(item.width);
        let height = patch.height.unwrap_or(item.height);
        if !valid_dimension(width) || !valid_dimension(height) {
            tracing::warn!(%id, width, height, "rejected undersized furniture update");
            return false;
        }

        if let Some(x) = patch.x {
            item.x = x;
        }
        if let Some(y) = patch.y {
            item.y = y;
        }
        item.width = width;
        item.height = height;
        if let Some(r) = patch.rotation {
            item.rotation = r;
        }
        true
    }

    /// Toggle the horizontal mirror of the selected item.
    pub fn flip_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(item) = self.furniture.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        item.flipped = !item.flipped;
        tracing::debug!(%id, flipped = item.flipped, "furniture flipped");
        true
    }

    /// Remove the selected item and clear the selection.
    pub fn delete_selected(&mut self) -> Option<ItemId> {
        let id = self.selected.take()?;
        self.furniture.retain(|f| f.id != id);
        tracing::debug!(%id, "furniture deleted");
        Some(id)
    }

    /// Select an item, or deselect with `None`. Unknown ids deselect.
    pub fn select(&mut self, id: Option<ItemId>) {
        self.selected = id.filter(|id| self.item(id).is_some());
    }

    // --- Mode / paint ---

    /// Switch mode. Selection never survives a mode switch; the draft does.
    pub fn set_mode(&mut self, mode: Mode) {
        self.selected = None;
        self.mode = mode;
    }

    pub fn set_paint_color(&mut self, color: Color) {
        self.paint_color = color;
    }

    /// Append a point to the draft polygon.
    pub fn push_draft_point(&mut self, point: Point) {
        self.draft.push(point);
    }

    /// Turn the draft into a wall polygon painted with the active color.
    ///
    /// Returns `None` (leaving the draft untouched) if it has fewer than 3 points.
    pub fn close_draft(&mut self) -> Option<PolygonId> {
        if self.draft.len() < 3 {
            return None;
        }
        let polygon = WallPolygon { id: Uuid::new_v4(), points: std::mem::take(&mut self.draft), color: self.paint_color };
        let id = polygon.id;
        tracing::debug!(%id, points = polygon.points.len(), color = %polygon.color, "wall polygon closed");
        self.walls.push(polygon);
        Some(id)
    }

    /// Discard the draft without creating a polygon.
    pub fn clear_points(&mut self) {
        self.draft.clear();
    }

    /// Remove every wall polygon and the draft.
    pub fn clear_paint(&mut self) {
        self.walls.clear();
        self.draft.clear();
    }

    /// Empty the room, optionally keeping the background photo.
    pub fn clear_scene(&mut self, keep_background: bool) {
        if !keep_background {
            self.background = None;
        }
        self.furniture.clear();
        self.walls.clear();
        self.draft.clear();
        self.selected = None;
    }
}

fn valid_dimension(v: f64) -> bool {
    v.is_finite() && v >= MIN_ITEM_SIZE
}
