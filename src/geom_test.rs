#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(10.0, 20.0);
    assert_eq!(a + b, Point::new(11.0, 22.0));
    assert_eq!(b - a, Point::new(9.0, 18.0));
}

// =============================================================
// fit_to_bounds
// =============================================================

#[test]
fn fit_wide_image_fills_width() {
    let s = fit_to_bounds(1600.0, 900.0, 800.0, 800.0);
    assert!(approx_eq(s.width, 800.0));
    assert!(approx_eq(s.height, 450.0));
}

#[test]
fn fit_tall_image_fills_height() {
    let s = fit_to_bounds(600.0, 1200.0, 800.0, 600.0);
    assert!(approx_eq(s.height, 600.0));
    assert!(approx_eq(s.width, 300.0));
}

#[test]
fn fit_same_aspect_fills_both() {
    let s = fit_to_bounds(400.0, 300.0, 800.0, 600.0);
    assert!(approx_eq(s.width, 800.0));
    assert!(approx_eq(s.height, 600.0));
}

#[test]
fn fit_upscales_small_images() {
    let s = fit_to_bounds(10.0, 5.0, 1000.0, 1000.0);
    assert!(approx_eq(s.width, 1000.0));
    assert!(approx_eq(s.height, 500.0));
}

#[test]
fn fit_degenerate_input_is_zero() {
    assert_eq!(fit_to_bounds(0.0, 100.0, 800.0, 600.0), Size::ZERO);
    assert_eq!(fit_to_bounds(100.0, 100.0, -1.0, 600.0), Size::ZERO);
    assert_eq!(fit_to_bounds(f64::NAN, 100.0, 800.0, 600.0), Size::ZERO);
}

#[test]
fn fit_respects_bounds_and_aspect_across_grid() {
    let dims = [1.0, 3.0, 17.0, 240.0, 1024.0, 4000.0];
    for &iw in &dims {
        for &ih in &dims {
            for &bw in &dims {
                for &bh in &dims {
                    let s = fit_to_bounds(iw, ih, bw, bh);
                    assert!(s.width <= bw + EPSILON, "w {} > {bw}", s.width);
                    assert!(s.height <= bh + EPSILON, "h {} > {bh}", s.height);
                    let expected = iw / ih;
                    let actual = s.width / s.height;
                    assert!((actual - expected).abs() / expected < 1e-9, "aspect {actual} != {expected}");
                }
            }
        }
    }
}

// =============================================================
// Distance
// =============================================================

#[test]
fn squared_distance_pythagorean() {
    assert_eq!(squared_distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 25.0);
}

#[test]
fn near_point_uses_strict_threshold() {
    let origin = Point::new(0.0, 0.0);
    assert!(is_near_point(Point::new(5.0, 5.0), origin, 15.0));
    assert!(is_near_point(Point::new(14.9, 0.0), origin, 15.0));
    // Exactly on the circle is not "near": 225 is not < 225.
    assert!(!is_near_point(Point::new(15.0, 0.0), origin, 15.0));
    assert!(!is_near_point(Point::new(9.0, 12.0), origin, 15.0));
}

// =============================================================
// Flatten / rotate
// =============================================================

#[test]
fn flatten_interleaves_coordinates() {
    let pts = [Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)];
    assert_eq!(flatten_polygon(&pts), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn flatten_empty_is_empty() {
    assert!(flatten_polygon(&[]).is_empty());
}

#[test]
fn rotate_quarter_turn_is_clockwise_on_screen() {
    let v = rotate_vec(Point::new(1.0, 0.0), 90.0);
    assert!(point_approx_eq(v, Point::new(0.0, 1.0)));
}

#[test]
fn rotate_full_turn_is_identity() {
    let v = rotate_vec(Point::new(3.0, -2.0), 360.0);
    assert!(point_approx_eq(v, Point::new(3.0, -2.0)));
}

#[test]
fn normalize_degrees_wraps() {
    assert!(approx_eq(normalize_degrees(370.0), 10.0));
    assert!(approx_eq(normalize_degrees(-90.0), 270.0));
    assert!(approx_eq(normalize_degrees(720.0), 0.0));
}
