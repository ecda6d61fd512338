//! Geometry helpers: points, sizes, image fitting, and polygon flattening.
//!
//! Everything here is pure. Coordinates are workspace pixels with the origin
//! at the top-left of the stage and y growing downwards.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in workspace space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in workspace pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are strictly positive and finite.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Scale an image into a bounding box without distorting it ("contain" fit).
///
/// The result touches one pair of bounds exactly and stays inside the other.
/// Degenerate input (zero, negative, NaN) yields [`Size::ZERO`].
#[must_use]
pub fn fit_to_bounds(image_w: f64, image_h: f64, bounds_w: f64, bounds_h: f64) -> Size {
    let image = Size::new(image_w, image_h);
    let bounds = Size::new(bounds_w, bounds_h);
    if !image.is_drawable() || !bounds.is_drawable() {
        return Size::ZERO;
    }

    let image_aspect = image_w / image_h;
    let bounds_aspect = bounds_w / bounds_h;
    if image_aspect > bounds_aspect {
        Size::new(bounds_w, (bounds_w / image_aspect).min(bounds_h))
    } else {
        Size::new((bounds_h * image_aspect).min(bounds_w), bounds_h)
    }
}

#[must_use]
pub fn squared_distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// True iff `a` lies strictly inside the circle of `radius` around `b`.
#[must_use]
pub fn is_near_point(a: Point, b: Point, radius: f64) -> bool {
    squared_distance(a, b) < radius * radius
}

/// Interleave points as `[x0, y0, x1, y1, ...]`.
#[must_use]
pub fn flatten_polygon(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Rotate a vector clockwise (screen orientation) by `degrees`.
#[must_use]
pub fn rotate_vec(v: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize an angle in degrees into `[0, 360)` for display.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}
