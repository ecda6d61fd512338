#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::VIEWPORT_PADDING_PX;
use crate::geom::{Point, Size, fit_to_bounds};

/// The host container the stage is centered in.
///
/// `width` / `height` are the container's CSS pixels. The stage (the fitted
/// background) is placed in the middle of the padded area, so container
/// coordinates and workspace coordinates differ by the stage origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, padding: VIEWPORT_PADDING_PX }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self { width, height, padding }
    }

    /// Area left for the stage once padding is removed from both sides.
    #[must_use]
    pub fn available(&self) -> Size {
        Size::new(
            (self.width - 2.0 * self.padding).max(0.0),
            (self.height - 2.0 * self.padding).max(0.0),
        )
    }

    /// Stage size for an image of the given natural dimensions.
    #[must_use]
    pub fn fit(&self, natural: Size) -> Size {
        let avail = self.available();
        fit_to_bounds(natural.width, natural.height, avail.width, avail.height)
    }

    /// Container-space position of the stage's top-left corner.
    #[must_use]
    pub fn stage_origin(&self, stage: Size) -> Point {
        Point::new((self.width - stage.width) * 0.5, (self.height - stage.height) * 0.5)
    }

    /// Convert a container-space point (CSS pixels) to workspace coordinates.
    #[must_use]
    pub fn container_to_stage(&self, stage: Size, container: Point) -> Point {
        container - self.stage_origin(stage)
    }

    /// Convert a workspace point to container-space coordinates.
    #[must_use]
    pub fn stage_to_container(&self, stage: Size, workspace: Point) -> Point {
        workspace + self.stage_origin(stage)
    }
}
