//! Shared numeric constants for the workspace crate.

// ── Furniture ───────────────────────────────────────────────────

/// Smallest width or height a resize may leave on a furniture item.
pub const MIN_ITEM_SIZE: f64 = 10.0;

/// Width and height of a freshly added furniture item.
pub const DEFAULT_ITEM_SIZE: f64 = 150.0;

/// Top-left position of a freshly added furniture item.
pub const DEFAULT_ITEM_POSITION: f64 = 50.0;

// ── Paint ───────────────────────────────────────────────────────

/// Distance from the first draft point that closes a polygon, in pixels.
pub const CLOSE_RADIUS_PX: f64 = 15.0;

/// Fill opacity of every completed wall polygon.
pub const WALL_OPACITY: f32 = 0.5;

/// Marker radius for the first draft vertex.
pub const FIRST_VERTEX_RADIUS_PX: f32 = 6.0;

/// Marker radius for the remaining draft vertices.
pub const VERTEX_RADIUS_PX: f32 = 4.0;

// ── Handles ─────────────────────────────────────────────────────

/// Hit slop in pixels for resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge to the rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Viewport / export ───────────────────────────────────────────

/// Padding kept between the container edge and the fitted stage, per side.
pub const VIEWPORT_PADDING_PX: f64 = 16.0;

/// Output scale used by the export button.
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Suggested file name handed to the download collaborator.
pub const EXPORT_FILE_NAME: &str = "room-design.png";
