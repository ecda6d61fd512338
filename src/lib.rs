//! Room design workspace engine.
//!
//! A room photo is fitted into the viewport, furniture sprites are placed
//! over it and transformed (drag, resize, rotate, flip), and wall regions are
//! traced point by point and tinted with paint colors. The composite can be
//! rasterized and exported as PNG. The crate compiles to WebAssembly; the host
//! page only wires DOM events to [`web::Engine`] and acts on the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event dispatcher, export scheduling, and testable [`engine::EngineCore`] |
//! | [`web`] | Browser host wrapping an `HtmlCanvasElement` |
//! | [`scene`] | Scene model: background, furniture, walls, draft, selection |
//! | [`transform`] | Drag / resize / rotate gestures with live preview |
//! | [`polygon`] | Click-to-place wall polygons with closure detection |
//! | [`render`] | `tiny-skia` compositor, image store, PNG export |
//! | [`hit`] | Hit-testing furniture bodies and transform handles |
//! | [`input`] | Buttons, keys, and the gesture state machine |
//! | [`keys`] | Scoped keyboard listener subscription |
//! | [`viewport`] | Container padding, stage fit, coordinate conversion |
//! | [`geom`] | Points, sizes, image fitting, rotation helpers |
//! | [`catalog`] | Built-in furniture sprites and paint colors |
//! | [`suggest`] | Canned design suggestions on a delay |
//! | [`config`] | Environment-driven tuning |
//! | [`error`] | Workspace error type |
//! | [`consts`] | Shared numeric constants |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod keys;
pub mod polygon;
pub mod render;
pub mod scene;
pub mod suggest;
pub mod transform;
pub mod viewport;
pub mod web;
