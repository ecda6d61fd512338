use std::rc::Rc;
use std::time::Duration;

use image::RgbaImage;
use rand::Rng;
use tiny_skia::Pixmap;

use crate::config::WorkspaceConfig;
use crate::error::WorkspaceError;
use crate::geom::{Point, Size};
use crate::hit::{HitPart, ResizeAnchor, hit_test};
use crate::input::{Button, InputState, Key};
use crate::keys::{KeyBinding, KeySource};
use crate::polygon::{self, PolygonEvent};
use crate::render::{self, Frame, ImageStore};
use crate::scene::{Color, FurniturePatch, ImageRef, ItemId, Mode, PolygonId, Scene};
use crate::suggest::SuggestionBox;
use crate::transform;
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Message shown when an export cannot be produced.
pub const EXPORT_FAILED_MESSAGE: &str = "Sorry, error exporting.";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SelectionChanged(Option<ItemId>),
    ItemUpdated { id: ItemId, patch: FurniturePatch },
    ItemDeleted { id: ItemId },
    PolygonClosed { id: PolygonId },
    /// PNG bytes for the download collaborator.
    ExportReady { file_name: String, bytes: Vec<u8> },
    /// A user-facing message (e.g. an alert).
    Notify(String),
    SetCursor(String),
}

/// Loading state of the room photo.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackgroundStatus {
    #[default]
    Empty,
    Loading(ImageRef),
    Ready { image: ImageRef, natural: Size },
    Failed { image: ImageRef, reason: String },
}

impl BackgroundStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading(_) => "loading",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Empty => None,
            Self::Loading(image) | Self::Ready { image, .. } | Self::Failed { image, .. } => Some(image),
        }
    }
}

/// An export waiting for the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingExport {
    scale: f64,
    /// Selection to put back once the capture is done. Dropped when the
    /// selection changes before then.
    restore: Option<ItemId>,
}

/// Workspace state and event handling, free of any browser types.
///
/// `web::Engine` wraps this and adds the canvas; tests drive it directly.
pub struct EngineCore {
    pub scene: Scene,
    pub input: InputState,
    pub viewport: Viewport,
    pub config: WorkspaceConfig,
    pub images: ImageStore,
    pub suggestion: SuggestionBox,
    pub dpr: f64,
    background: BackgroundStatus,
    keys: KeyBinding,
    /// Bumped on every furniture change; re-binds the delete key.
    revision: u64,
    pending_export: Option<PendingExport>,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: WorkspaceConfig) -> Self {
        Self {
            scene: Scene::new(),
            input: InputState::default(),
            viewport: Viewport { padding: config.viewport_padding, ..Viewport::default() },
            config,
            images: ImageStore::new(),
            suggestion: SuggestionBox::default(),
            dpr: 1.0,
            background: BackgroundStatus::Empty,
            keys: KeyBinding::new(),
            revision: 0,
            pending_export: None,
            cursor: "default".to_owned(),
        }
    }

    // --- Viewport ---

    /// Update the container size (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport.width = width_css.max(0.0);
        self.viewport.height = height_css.max(0.0);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    /// Fitted stage size; zero until the background is ready.
    #[must_use]
    pub fn stage(&self) -> Size {
        match &self.background {
            BackgroundStatus::Ready { natural, .. } => self.viewport.fit(*natural),
            _ => Size::ZERO,
        }
    }

    /// Container-space point to workspace coordinates.
    #[must_use]
    pub fn to_stage(&self, container: Point) -> Point {
        self.viewport.container_to_stage(self.stage(), container)
    }

    // --- Background ---

    /// Start using `image` as the room photo. Resets the whole scene.
    ///
    /// When the image is already decoded the background is ready at once;
    /// otherwise it stays `Loading` until [`Self::load_image`] delivers it.
    pub fn set_background(&mut self, image: ImageRef) {
        self.drop_background_pixels(Some(&image));
        self.scene.set_background(image.clone());
        self.reset_transient();
        self.suggestion.clear();
        self.background = match self.images.natural_size(&image) {
            Some(natural) => BackgroundStatus::Ready { image, natural },
            None => BackgroundStatus::Loading(image),
        };
        tracing::info!(status = self.background.label(), "background set");
        self.furniture_changed();
    }

    #[must_use]
    pub fn background_status(&self) -> &BackgroundStatus {
        &self.background
    }

    /// Deliver decoded pixels for `image` (the room photo or a sprite).
    pub fn load_image(&mut self, image: ImageRef, pixels: &RgbaImage) -> Vec<Action> {
        match self.images.insert_rgba(image.clone(), pixels) {
            Ok(natural) => self.image_stored(image, natural),
            Err(e) => self.image_failed(image, &e),
        }
    }

    /// Decode PNG/JPEG bytes for `image` and deliver them.
    pub fn load_image_bytes(&mut self, image: ImageRef, bytes: &[u8]) -> Vec<Action> {
        match self.images.load_bytes(image.clone(), bytes) {
            Ok(natural) => self.image_stored(image, natural),
            Err(e) => self.image_failed(image, &e),
        }
    }

    /// The host could not fetch the room photo.
    pub fn background_failed(&mut self, reason: impl Into<String>) -> Vec<Action> {
        let BackgroundStatus::Loading(image) = &self.background else {
            return Vec::new();
        };
        let image = image.clone();
        let reason = reason.into();
        tracing::warn!(image = %image, %reason, "background failed");
        self.background = BackgroundStatus::Failed { image, reason };
        vec![Action::RenderNeeded]
    }

    fn image_stored(&mut self, image: ImageRef, natural: Size) -> Vec<Action> {
        if matches!(&self.background, BackgroundStatus::Loading(loading) if *loading == image) {
            tracing::info!(image = %image, width = natural.width, height = natural.height, "background ready");
            self.background = BackgroundStatus::Ready { image, natural };
        }
        vec![Action::RenderNeeded]
    }

    fn image_failed(&mut self, image: ImageRef, err: &WorkspaceError) -> Vec<Action> {
        if matches!(&self.background, BackgroundStatus::Loading(loading) if *loading == image) {
            return self.background_failed(err.to_string());
        }
        tracing::warn!(image = %image, error = %err, "sprite failed to load");
        Vec::new()
    }

    // --- Commands ---

    /// Add a furniture item with the default geometry.
    pub fn add_furniture(&mut self, image: ImageRef) -> ItemId {
        let id = self.scene.add_furniture(image);
        self.furniture_changed();
        id
    }

    /// Mirror the selected item. Only meaningful in select mode.
    pub fn flip_selected(&mut self) -> bool {
        if self.scene.mode() != Mode::Select || !self.scene.flip_selected() {
            return false;
        }
        self.furniture_changed();
        true
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.input = InputState::Idle;
        self.scene.set_mode(mode);
        self.selection_changed();
    }

    pub fn set_paint_color(&mut self, color: Color) -> Vec<Action> {
        self.scene.set_paint_color(color);
        vec![Action::RenderNeeded]
    }

    /// Drop the in-progress polygon.
    pub fn clear_points(&mut self) -> Vec<Action> {
        self.scene.clear_points();
        vec![Action::RenderNeeded]
    }

    /// Drop every wall polygon and the in-progress one.
    pub fn clear_paint(&mut self) -> Vec<Action> {
        self.scene.clear_paint();
        vec![Action::RenderNeeded]
    }

    /// Remove everything, including the room photo.
    pub fn clear_room(&mut self) {
        self.drop_background_pixels(None);
        self.scene.clear_scene(false);
        self.background = BackgroundStatus::Empty;
        self.suggestion.clear();
        self.reset_transient();
        tracing::info!("room cleared");
        self.furniture_changed();
    }

    /// Ask for a design suggestion; it resolves through [`Self::poll_suggestion`].
    pub fn request_suggestion(&mut self, now: Duration, rng: &mut impl Rng) {
        self.suggestion.request(now, rng);
    }

    /// Returns `true` when the suggestion just became ready.
    pub fn poll_suggestion(&mut self, now: Duration) -> bool {
        self.suggestion.poll(now)
    }

    /// Route delete-key presses through `source` while an item is selected.
    pub fn attach_key_source(&mut self, source: Rc<dyn KeySource>) {
        self.keys.attach(source);
        self.sync_keys();
    }

    #[must_use]
    pub fn key_listener_bound(&self) -> bool {
        self.keys.is_bound()
    }

    /// Release host resources (the key listener) and any in-flight work.
    pub fn teardown(&mut self) {
        self.keys.teardown();
        self.input = InputState::Idle;
        self.pending_export = None;
    }

    // --- Input events ---

    /// Handle pointer down at a container-space point.
    pub fn on_pointer_down(&mut self, container_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.background.is_ready() {
            return Vec::new();
        }
        let pt = self.to_stage(container_pt);
        match self.scene.mode() {
            Mode::Select => self.select_pointer_down(pt),
            Mode::Paint => self.paint_pointer_down(pt),
        }
    }

    /// Handle pointer move at a container-space point.
    pub fn on_pointer_move(&mut self, container_pt: Point) -> Vec<Action> {
        let pt = self.to_stage(container_pt);
        if self.input.is_idle() {
            return self.hover_cursor(pt);
        }
        if transform::update(&mut self.input, pt) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Handle pointer up at a container-space point.
    pub fn on_pointer_up(&mut self, container_pt: Point) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        let pt = self.to_stage(container_pt);
        transform::update(&mut self.input, pt);

        let gesture = std::mem::take(&mut self.input);
        let mut actions = Vec::new();
        if let Some((id, patch)) = transform::commit(gesture, &mut self.scene) {
            self.furniture_changed();
            actions.push(Action::ItemUpdated { id, patch });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Handle a key press delivered by the key source.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            if self.scene.selected().is_none() {
                return Vec::new();
            }
            self.input = InputState::Idle;
            self.scene.select(None);
            self.selection_changed();
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }

        if key.is_delete() && self.keys.is_bound() {
            let Some(id) = self.scene.delete_selected() else {
                return Vec::new();
            };
            tracing::debug!(%id, "deleted via keyboard");
            self.input = InputState::Idle;
            self.furniture_changed();
            return vec![Action::ItemDeleted { id }, Action::SelectionChanged(None), Action::RenderNeeded];
        }
        Vec::new()
    }

    fn select_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let before = self.scene.selected();
        let Some(hit) = hit_test(pt, &self.scene, before) else {
            if before.is_none() {
                return Vec::new();
            }
            self.scene.select(None);
            self.selection_changed();
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        };

        let mut actions = Vec::new();
        if before != Some(hit.item_id) {
            self.scene.select(Some(hit.item_id));
            self.selection_changed();
            actions.push(Action::SelectionChanged(Some(hit.item_id)));
        }
        if let Some(item) = self.scene.item(&hit.item_id) {
            self.input = transform::begin(item, hit.part, pt);
            tracing::debug!(id = %hit.item_id, part = ?hit.part, "gesture started");
        }
        actions.push(Action::SetCursor(cursor_for(hit.part).to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn paint_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        match polygon::click(&mut self.scene, pt, self.config.close_radius) {
            PolygonEvent::PointAdded { .. } => vec![Action::RenderNeeded],
            PolygonEvent::Closed(id) => {
                tracing::debug!(%id, walls = self.scene.walls().len(), "wall polygon closed");
                vec![Action::PolygonClosed { id }, Action::RenderNeeded]
            }
        }
    }

    fn hover_cursor(&mut self, pt: Point) -> Vec<Action> {
        let cursor = match self.scene.mode() {
            Mode::Paint => "crosshair",
            Mode::Select => match hit_test(pt, &self.scene, self.scene.selected()) {
                Some(hit) => cursor_for(hit.part),
                None => "default",
            },
        };
        if cursor == self.cursor {
            return Vec::new();
        }
        cursor.clone_into(&mut self.cursor);
        vec![Action::SetCursor(cursor.to_owned())]
    }

    // --- Render / export ---

    /// Draw the on-screen frame at the device pixel ratio.
    ///
    /// Before the background is ready the frame covers the padded container
    /// with the neutral fill.
    ///
    /// # Errors
    ///
    /// Propagates [`render::draw`] failures (e.g. a zero-sized container).
    pub fn render_frame(&self) -> Result<Pixmap, WorkspaceError> {
        let ready = self.background.is_ready();
        let stage = if ready { self.stage() } else { self.viewport.available() };
        let frame = Frame {
            scene: &self.scene,
            images: &self.images,
            stage,
            background_ready: ready,
            preview: self.input.preview(),
            show_selection: self.pending_export.is_none(),
        };
        render::draw(&frame, self.dpr)
    }

    /// Render the committed scene without the selection overlay.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::NoBackground`] or [`WorkspaceError::BackgroundNotReady`]
    /// until a photo is ready, then any compositor failure.
    pub fn rasterize(&self, scale: f64) -> Result<RgbaImage, WorkspaceError> {
        match &self.background {
            BackgroundStatus::Empty => return Err(WorkspaceError::NoBackground),
            BackgroundStatus::Loading(image) => {
                return Err(WorkspaceError::BackgroundNotReady(format!("{image} is still loading")));
            }
            BackgroundStatus::Failed { reason, .. } => {
                return Err(WorkspaceError::BackgroundNotReady(reason.clone()));
            }
            BackgroundStatus::Ready { .. } => {}
        }
        let frame = Frame {
            scene: &self.scene,
            images: &self.images,
            stage: self.stage(),
            background_ready: true,
            preview: None,
            show_selection: false,
        };
        let pixmap = render::draw(&frame, scale)?;
        render::to_rgba_image(&pixmap)
    }

    /// Start an export: hide the selection now, capture on the next frame.
    ///
    /// A second request while one is pending only replaces the scale.
    pub fn request_export(&mut self, scale: f64) -> Vec<Action> {
        if !self.background.is_ready() {
            tracing::warn!(status = self.background.label(), "export requested without a ready background");
            return Vec::new();
        }
        if let Some(pending) = self.pending_export.as_mut() {
            pending.scale = scale;
            return Vec::new();
        }

        let restore = self.scene.selected();
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        if restore.is_some() {
            self.scene.select(None);
            self.selection_changed();
            actions.push(Action::SelectionChanged(None));
        }
        self.pending_export = Some(PendingExport { scale, restore });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Export at the configured pixel ratio.
    pub fn request_default_export(&mut self) -> Vec<Action> {
        self.request_export(self.config.export_pixel_ratio)
    }

    #[must_use]
    pub fn export_pending(&self) -> bool {
        self.pending_export.is_some()
    }

    /// Run the deferred capture, if one is pending.
    ///
    /// The previous selection comes back whether or not the capture worked.
    pub fn on_animation_frame(&mut self) -> Vec<Action> {
        let Some(pending) = self.pending_export.take() else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        match self.rasterize(pending.scale).and_then(|img| render::encode_png(&img)) {
            Ok(bytes) => {
                tracing::info!(bytes = bytes.len(), scale = pending.scale, "export ready");
                actions.push(Action::ExportReady { file_name: self.config.export_file_name.clone(), bytes });
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                actions.push(Action::Notify(EXPORT_FAILED_MESSAGE.to_owned()));
            }
        }

        let current = self.scene.selected();
        if let Some(id) = pending.restore {
            self.scene.select(Some(id));
        }
        self.selection_changed();
        if self.scene.selected() != current {
            actions.push(Action::SelectionChanged(self.scene.selected()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.scene.selected()
    }

    /// A JSON view of the scene for host-side inspection.
    #[must_use]
    pub fn snapshot_json(&self) -> serde_json::Value {
        let stage = self.stage();
        serde_json::json!({
            "background": self.background.label(),
            "stage": { "width": stage.width, "height": stage.height },
            "scene": self.scene,
            "suggestion": self.suggestion.text(),
        })
    }

    // --- Bookkeeping ---

    fn furniture_changed(&mut self) {
        self.revision += 1;
        self.sync_keys();
    }

    fn selection_changed(&mut self) {
        if let Some(pending) = self.pending_export.as_mut() {
            pending.restore = None;
        }
        self.sync_keys();
    }

    /// Forget the decoded pixels of the current room photo unless it is `keep`.
    fn drop_background_pixels(&mut self, keep: Option<&ImageRef>) {
        let Some(old) = self.background.image() else {
            return;
        };
        if Some(old) == keep {
            return;
        }
        if self.images.remove(old) {
            tracing::debug!(image = %old, "released background pixels");
        }
    }

    fn sync_keys(&mut self) {
        self.keys.sync(self.scene.selected(), self.revision);
    }

    fn reset_transient(&mut self) {
        self.input = InputState::Idle;
        self.pending_export = None;
    }
}

fn cursor_for(part: HitPart) -> &'static str {
    match part {
        HitPart::Body => "move",
        HitPart::RotateHandle => "grab",
        HitPart::ResizeHandle(ResizeAnchor::N | ResizeAnchor::S) => "ns-resize",
        HitPart::ResizeHandle(ResizeAnchor::E | ResizeAnchor::W) => "ew-resize",
        HitPart::ResizeHandle(ResizeAnchor::Ne | ResizeAnchor::Sw) => "nesw-resize",
        HitPart::ResizeHandle(ResizeAnchor::Nw | ResizeAnchor::Se) => "nwse-resize",
    }
}
