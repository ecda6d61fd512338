//! Scene compositor: draws the workspace into a `tiny-skia` pixmap.
//!
//! Layers, back to front:
//!
//! 1. background photo scaled to the stage (neutral fill until it is ready)
//! 2. wall polygons at half opacity, then the draft guide and its vertex markers
//! 3. furniture sprites in insertion order, then the selection overlay
//!
//! Everything is drawn in workspace coordinates under one scale transform, so
//! the same code paints the on-screen frame (scale 1 or the device pixel
//! ratio) and the export (scale = pixel ratio).

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::consts::{FIRST_VERTEX_RADIUS_PX, VERTEX_RADIUS_PX};
use crate::error::WorkspaceError;
use crate::geom::{Point, Size};
use crate::hit::{resize_handle_positions, rotate_handle_position};
use crate::scene::{FurnitureItem, ImageRef, ItemId, Scene, WallPolygon};
use crate::transform::LiveTransform;

// ── Style ───────────────────────────────────────────────────────

const HANDLE_SIZE: f32 = 10.0;
const ROTATE_KNOB_RADIUS: f32 = 5.0;
const GUIDE_WIDTH: f32 = 1.0;
const OUTLINE_WIDTH: f32 = 1.0;

fn neutral_color() -> Color {
    Color::from_rgba8(226, 232, 240, 255)
}
fn ink_color() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}
fn first_vertex_color() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}
fn vertex_color() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}
fn selection_color() -> Color {
    Color::from_rgba8(0, 161, 255, 255)
}

// =============================================================
// Image store
// =============================================================

/// Decoded images keyed by [`ImageRef`], ready to draw.
///
/// Pixels are kept premultiplied, the way `tiny-skia` wants them.
#[derive(Default)]
pub struct ImageStore {
    images: HashMap<ImageRef, Pixmap>,
}

impl ImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode PNG/JPEG bytes and store them under `key`. Returns the natural size.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::Decode`] for unreadable bytes, or
    /// [`WorkspaceError::PixmapAlloc`] for an empty image.
    pub fn load_bytes(&mut self, key: ImageRef, bytes: &[u8]) -> Result<Size, WorkspaceError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        self.insert_rgba(key, &decoded)
    }

    /// Store an already-decoded image under `key`. Returns the natural size.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::PixmapAlloc`] when the image has no pixels.
    pub fn insert_rgba(&mut self, key: ImageRef, image: &RgbaImage) -> Result<Size, WorkspaceError> {
        let (width, height) = image.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or(WorkspaceError::PixmapAlloc { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        tracing::debug!(image = %key, width, height, "image stored");
        self.images.insert(key, pixmap);
        Ok(Size::new(f64::from(width), f64::from(height)))
    }

    #[must_use]
    pub fn get(&self, key: &ImageRef) -> Option<&Pixmap> {
        self.images.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ImageRef) -> bool {
        self.images.contains_key(key)
    }

    /// Pixel dimensions of a stored image.
    #[must_use]
    pub fn natural_size(&self, key: &ImageRef) -> Option<Size> {
        self.images
            .get(key)
            .map(|p| Size::new(f64::from(p.width()), f64::from(p.height())))
    }

    pub fn remove(&mut self, key: &ImageRef) -> bool {
        self.images.remove(key).is_some()
    }
}

// =============================================================
// Frame
// =============================================================

/// Everything one draw needs, borrowed from the engine.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub images: &'a ImageStore,
    /// Fitted stage size in workspace pixels.
    pub stage: Size,
    /// Whether the background finished loading. Until then the frame is the
    /// neutral fill alone, never a partial scene.
    pub background_ready: bool,
    /// In-flight gesture geometry that overrides the committed item.
    pub preview: Option<(ItemId, &'a LiveTransform)>,
    /// Draw the selection outline and handles.
    pub show_selection: bool,
}

/// Paint `frame` into a new pixmap at `scale` device pixels per workspace pixel.
///
/// # Errors
///
/// [`WorkspaceError::EmptyStage`] when the stage (or scale) has no area, or
/// [`WorkspaceError::PixmapAlloc`] when the pixmap cannot be allocated.
pub fn draw(frame: &Frame<'_>, scale: f64) -> Result<Pixmap, WorkspaceError> {
    let device = Size::new(frame.stage.width * scale, frame.stage.height * scale);
    if !device.is_drawable() {
        return Err(WorkspaceError::EmptyStage { width: device.width, height: device.height });
    }
    let (width, height) = (to_px(device.width), to_px(device.height));
    let mut pixmap = Pixmap::new(width, height).ok_or(WorkspaceError::PixmapAlloc { width, height })?;
    let base = Transform::from_scale(f32_of(scale), f32_of(scale));

    pixmap.fill(neutral_color());
    if !frame.background_ready {
        return Ok(pixmap);
    }

    draw_background(&mut pixmap, frame, base);
    for wall in frame.scene.walls() {
        draw_wall(&mut pixmap, wall, base);
    }
    draw_draft(&mut pixmap, frame.scene.draft(), base);

    for item in frame.scene.furniture() {
        let shown = previewed(item, frame.preview);
        draw_sprite(&mut pixmap, &shown, frame.images, base);
    }
    if frame.show_selection {
        if let Some(item) = frame.scene.selected_item() {
            draw_selection(&mut pixmap, &previewed(item, frame.preview), base);
        }
    }

    tracing::trace!(width, height, items = frame.scene.furniture().len(), "frame drawn");
    Ok(pixmap)
}

/// Convert a pixmap into a straight-alpha RGBA image.
///
/// # Errors
///
/// [`WorkspaceError::PixmapAlloc`] if the buffer does not match the dimensions.
pub fn to_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage, WorkspaceError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut buf = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        buf.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, buf).ok_or(WorkspaceError::PixmapAlloc { width, height })
}

/// Encode an RGBA image as PNG bytes.
///
/// # Errors
///
/// [`WorkspaceError::Encode`] when the encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, WorkspaceError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| WorkspaceError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

// =============================================================
// Layers
// =============================================================

fn draw_background(pixmap: &mut Pixmap, frame: &Frame<'_>, base: Transform) {
    let Some(photo) = frame.scene.background().and_then(|r| frame.images.get(r)) else {
        return;
    };
    let sx = frame.stage.width / f64::from(photo.width());
    let sy = frame.stage.height / f64::from(photo.height());
    let transform = base.pre_scale(f32_of(sx), f32_of(sy));
    pixmap.draw_pixmap(0, 0, photo.as_ref(), &sprite_paint(), transform, None);
}

fn draw_wall(pixmap: &mut Pixmap, wall: &WallPolygon, base: Transform) {
    let Some(path) = polyline(&wall.points, true) else {
        return;
    };
    let mut color = Color::from_rgba8(wall.color.r, wall.color.g, wall.color.b, 255);
    color.set_alpha(wall.opacity());
    let paint = solid(color);
    pixmap.fill_path(&path, &paint, FillRule::Winding, base, None);
}

fn draw_draft(pixmap: &mut Pixmap, draft: &[Point], base: Transform) {
    if draft.len() > 1 {
        if let Some(path) = polyline(draft, false) {
            let stroke = Stroke { width: GUIDE_WIDTH, ..Default::default() };
            pixmap.stroke_path(&path, &solid(ink_color()), &stroke, base, None);
        }
    }

    for (i, p) in draft.iter().enumerate() {
        let (radius, fill) = if i == 0 {
            (FIRST_VERTEX_RADIUS_PX, first_vertex_color())
        } else {
            (VERTEX_RADIUS_PX, vertex_color())
        };
        let Some(circle) = PathBuilder::from_circle(f32_of(p.x), f32_of(p.y), radius) else {
            continue;
        };
        pixmap.fill_path(&circle, &solid(fill), FillRule::Winding, base, None);
        let stroke = Stroke { width: OUTLINE_WIDTH, ..Default::default() };
        pixmap.stroke_path(&circle, &solid(ink_color()), &stroke, base, None);
    }
}

fn draw_sprite(pixmap: &mut Pixmap, item: &FurnitureItem, images: &ImageStore, base: Transform) {
    // Sprites still loading are skipped, like an <img> with no data yet.
    let Some(sprite) = images.get(&item.image) else {
        return;
    };
    let sx = item.width / f64::from(sprite.width());
    let sy = item.height / f64::from(sprite.height());
    let transform = item_transform(item, base, true).pre_scale(f32_of(sx), f32_of(sy));
    pixmap.draw_pixmap(0, 0, sprite.as_ref(), &sprite_paint(), transform, None);
}

fn draw_selection(pixmap: &mut Pixmap, item: &FurnitureItem, base: Transform) {
    let paint = solid(selection_color());
    let stroke = Stroke { width: OUTLINE_WIDTH, ..Default::default() };

    if let Some(rect) = Rect::from_xywh(0.0, 0.0, f32_of(item.width), f32_of(item.height)) {
        let outline = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&outline, &paint, &stroke, item_transform(item, base, false), None);
    }

    // Stem from the top edge to the rotate knob.
    let top_mid = item.local_to_world(Point::new(item.width * 0.5, 0.0));
    let knob = rotate_handle_position(item);
    if let Some(stem) = polyline(&[top_mid, knob], false) {
        pixmap.stroke_path(&stem, &paint, &stroke, base, None);
    }
    if let Some(circle) = PathBuilder::from_circle(f32_of(knob.x), f32_of(knob.y), ROTATE_KNOB_RADIUS) {
        pixmap.fill_path(&circle, &solid(vertex_color()), FillRule::Winding, base, None);
        pixmap.stroke_path(&circle, &paint, &stroke, base, None);
    }

    let half = HANDLE_SIZE * 0.5;
    for p in resize_handle_positions(item) {
        let Some(rect) = Rect::from_xywh(f32_of(p.x) - half, f32_of(p.y) - half, HANDLE_SIZE, HANDLE_SIZE) else {
            continue;
        };
        let handle = PathBuilder::from_rect(rect);
        pixmap.fill_path(&handle, &solid(vertex_color()), FillRule::Winding, base, None);
        pixmap.stroke_path(&handle, &paint, &stroke, base, None);
    }
}

// =============================================================
// Helpers
// =============================================================

/// Local box space to device space: translate, rotate about the top-left,
/// then mirror inside the box when flipped.
fn item_transform(item: &FurnitureItem, base: Transform, with_flip: bool) -> Transform {
    let placed = base
        .pre_translate(f32_of(item.x), f32_of(item.y))
        .pre_concat(Transform::from_rotate(f32_of(item.rotation)));
    if with_flip && item.flipped {
        placed.pre_translate(f32_of(item.width), 0.0).pre_scale(-1.0, 1.0)
    } else {
        placed
    }
}

fn previewed(item: &FurnitureItem, preview: Option<(ItemId, &LiveTransform)>) -> FurnitureItem {
    match preview {
        Some((id, live)) if id == item.id => live.apply_to(item),
        _ => item.clone(),
    }
}

fn polyline(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(f32_of(first.x), f32_of(first.y));
    for p in rest {
        pb.line_to(f32_of(p.x), f32_of(p.y));
    }
    if close {
        pb.close();
    }
    pb.finish()
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn sprite_paint() -> PixmapPaint {
    PixmapPaint { quality: FilterQuality::Bilinear, ..Default::default() }
}

#[allow(clippy::cast_possible_truncation)]
fn f32_of(v: f64) -> f32 {
    v as f32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(v: f64) -> u32 {
    v.round().max(1.0) as u32
}
