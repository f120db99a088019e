//! Debug overlays drawn onto the working frame.

use crate::core::corners::PathResult;
use crate::{Point2f, Point2i};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

/// Traced contours of the candidates.
pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Accepted corners.
pub const CORNER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const CORNER_RADIUS: i32 = 6;

/// Draws a closed polygon.
pub fn draw_outline(img: &mut RgbImage, poly: &[Point2i], color: Rgb<u8>) {
    let n = poly.len();
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        draw_line_segment_mut(img, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
    }
}

/// Draws a hollow circle on every corner.
pub fn draw_corners(img: &mut RgbImage, corners: &[Point2f], color: Rgb<u8>) {
    for c in corners {
        draw_hollow_circle_mut(img, (c.x.round() as i32, c.y.round() as i32), CORNER_RADIUS, color);
    }
}

/// Draws an ordered path, closing segment included.
pub fn draw_path(img: &mut RgbImage, path: &PathResult, color: Rgb<u8>) {
    for (a, b) in path.segments() {
        draw_line_segment_mut(img, (a.x, a.y), (b.x, b.y), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_touches_vertices() {
        let mut img = RgbImage::new(20, 20);
        let square = [
            Point2i::new(2, 2),
            Point2i::new(2, 15),
            Point2i::new(15, 15),
            Point2i::new(15, 2),
        ];
        draw_outline(&mut img, &square, CONTOUR_COLOR);

        for p in &square {
            assert_eq!(*img.get_pixel(p.x as u32, p.y as u32), CONTOUR_COLOR);
        }
        assert_eq!(*img.get_pixel(8, 2), CONTOUR_COLOR);
        assert_eq!(*img.get_pixel(8, 8), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_corners_are_ringed() {
        let mut img = RgbImage::new(30, 30);
        draw_corners(&mut img, &[Point2f::new(15.0, 15.0)], CORNER_COLOR);

        assert_eq!(*img.get_pixel(15 + CORNER_RADIUS as u32, 15), CORNER_COLOR);
        assert_eq!(*img.get_pixel(15, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_path_is_closed() {
        let mut img = RgbImage::new(20, 20);
        let path = PathResult {
            points: [
                Point2f::new(1.0, 1.0),
                Point2f::new(1.0, 10.0),
                Point2f::new(10.0, 10.0),
                Point2f::new(10.0, 1.0),
            ],
        };
        draw_path(&mut img, &path, CORNER_COLOR);
        // Closing edge from (10, 1) back to (1, 1).
        assert_eq!(*img.get_pixel(5, 1), CORNER_COLOR);
    }

    #[test]
    fn test_drawing_off_canvas_is_clipped() {
        let mut img = RgbImage::new(10, 10);
        draw_corners(&mut img, &[Point2f::new(-50.0, 80.0)], CORNER_COLOR);
        draw_outline(&mut img, &[Point2i::new(-5, -5), Point2i::new(30, -5)], CONTOUR_COLOR);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
