//! Browser host: binds an [`EngineCore`] to an `HtmlCanvasElement`.
//!
//! The compositor runs natively into a pixmap; each frame is copied onto the
//! canvas with `putImageData`, offset so the stage sits centered in the
//! container. Key presses arrive through a window `keydown` listener that is
//! only registered while an item is selected.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, KeyboardEvent, Window};

use crate::config::WorkspaceConfig;
use crate::engine::{Action, EngineCore};
use crate::geom::Point;
use crate::input::{Button, Key};
use crate::keys::{KeySource, ListenerId};
use crate::render;

/// Window `keydown` listeners that queue key names for the engine.
struct DomKeySource {
    window: Window,
    queue: Rc<RefCell<VecDeque<String>>>,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn FnMut(KeyboardEvent)>>>,
    next: Cell<ListenerId>,
}

impl DomKeySource {
    fn new(window: Window, queue: Rc<RefCell<VecDeque<String>>>) -> Self {
        Self { window, queue, listeners: RefCell::new(HashMap::new()), next: Cell::new(0) }
    }
}

impl KeySource for DomKeySource {
    fn add_listener(&self) -> ListenerId {
        let id = self.next.get() + 1;
        self.next.set(id);

        let queue = Rc::clone(&self.queue);
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            queue.borrow_mut().push_back(event.key());
        });
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "failed to add keydown listener");
        }
        self.listeners.borrow_mut().insert(id, closure);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(closure) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "failed to remove keydown listener");
        }
    }
}

/// The full workspace engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    keys: Rc<RefCell<VecDeque<String>>>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, configured from the environment.
    ///
    /// # Errors
    ///
    /// Fails when there is no window or the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let keys = Rc::new(RefCell::new(VecDeque::new()));
        let mut core = EngineCore::with_config(WorkspaceConfig::from_env());
        core.attach_key_source(Rc::new(DomKeySource::new(window, Rc::clone(&keys))));
        Ok(Self { canvas, ctx, keys, core })
    }

    // --- Viewport ---

    /// Resize the backing store to the container at the device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * self.core.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * self.core.dpr).round().max(0.0) as u32);
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, container_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(container_pt, button)
    }

    pub fn on_pointer_move(&mut self, container_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(container_pt)
    }

    pub fn on_pointer_up(&mut self, container_pt: Point) -> Vec<Action> {
        self.core.on_pointer_up(container_pt)
    }

    /// Per-frame tick: drain queued key presses, resolve suggestions, and
    /// run a pending export.
    pub fn on_animation_frame(&mut self, now: Duration) -> Vec<Action> {
        let pending: Vec<String> = self.keys.borrow_mut().drain(..).collect();
        let mut actions = Vec::new();
        for key in pending {
            actions.extend(self.core.on_key_down(&Key::new(key)));
        }
        if self.core.poll_suggestion(now) {
            tracing::debug!("suggestion ready");
        }
        actions.extend(self.core.on_animation_frame());
        actions
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Compositor failures and `putImageData` exceptions.
    pub fn render(&self) -> Result<(), JsValue> {
        let to_js = |e: crate::error::WorkspaceError| JsValue::from_str(&e.to_string());
        let pixmap = self.core.render_frame().map_err(to_js)?;
        let rgba = render::to_rgba_image(&pixmap).map_err(to_js)?;

        let stage = if self.core.background_status().is_ready() {
            self.core.stage()
        } else {
            self.core.viewport.available()
        };
        let origin = self.core.viewport.stage_origin(stage);
        let dpr = self.core.dpr;

        self.ctx
            .clear_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba.as_raw()), rgba.width(), rgba.height())?;
        self.ctx.put_image_data(&data, (origin.x * dpr).round(), (origin.y * dpr).round())
    }

    /// Release the key listener and pending work.
    pub fn teardown(&mut self) {
        self.core.teardown();
        self.keys.borrow_mut().clear();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.teardown();
    }
}
