//! Error type shared by the fallible workspace operations.
//!
//! Most scene mutations cannot fail: unknown ids and rejected resizes are
//! no-ops. Only image I/O and rasterization surface errors.

/// Failures from decoding, rasterizing, or encoding workspace images.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("no background image loaded")]
    NoBackground,
    #[error("background image is not ready: {0}")]
    BackgroundNotReady(String),
    #[error("stage has no drawable area ({width}x{height})")]
    EmptyStage { width: f64, height: f64 },
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
}
