// src/core/detector.rs

use crate::core::config::DetectorOptions;
use crate::cv::contours::{find_external_contours, scratch_len};
use crate::cv::geometry::{approx_poly_dp, contour_area, is_contour_convex, perimeter, vertex_cosines};
use crate::{ImageView, Point2f, Point2i, QuadCorners};
use image::GrayImage;
use serde::Serialize;
use tracing::trace;

/// A convex four-sided polygon that passed every acceptance test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadCandidate {
    /// Vertices in approximation order, working-frame pixels.
    pub corners: QuadCorners,
    /// Absolute area of the traced contour.
    pub area: f64,
    /// Smallest corner cosine.
    pub min_cos: f64,
    /// Largest corner cosine.
    pub max_cos: f64,
}

/// Finds the first quadrilateral outline in a binary edge mask.
///
/// Outer contours are visited last traced first, so lower components in
/// the frame are tried before the ones above them. The first one whose
/// polygonal approximation is a convex quadrilateral with corner angles
/// inside the configured cosine band is returned and the scan stops.
/// It is not the largest or best quadrilateral in the frame.
#[derive(Debug, Clone, Default)]
pub struct QuadDetector {
    pub options: DetectorOptions,
}

impl QuadDetector {
    pub fn new(options: DetectorOptions) -> Self {
        QuadDetector { options }
    }

    /// Runs the contour scan on a 0/255 mask.
    pub fn find_quad(&self, mask: &GrayImage) -> Option<QuadCandidate> {
        self.find_quad_with(mask, |_| {})
    }

    /// Same as [`find_quad`](Self::find_quad), calling `visit` with the
    /// traced contour of every candidate whose approximation passes the
    /// area and convexity tests, in scan order, up to and including the
    /// winner.
    pub fn find_quad_with<F>(&self, mask: &GrayImage, mut visit: F) -> Option<QuadCandidate>
    where
        F: FnMut(&[Point2i]),
    {
        let (width, height) = mask.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let mut scratch = vec![0i32; scratch_len(width, height)];
        let contours = find_external_contours(&ImageView::from_gray(mask), &mut scratch);
        let min_area = self.options.min_area_ratio * width as f64 * height as f64;

        contours.iter().enumerate().find_map(|(index, contour)| {
            let (poly, area) = self.approximate(index, contour, min_area)?;
            visit(contour);
            self.accept(index, &poly, area)
        })
    }

    /// Area gate, polygon approximation and convexity gate.
    fn approximate(&self, index: usize, contour: &[Point2i], min_area: f64) -> Option<(Vec<Point2i>, f64)> {
        let area = contour_area(contour).abs();
        if area < min_area {
            trace!(index, area, min_area, "contour too small");
            return None;
        }

        let epsilon = self.options.epsilon_ratio * perimeter(contour);
        let poly = approx_poly_dp(contour, epsilon);
        if !is_contour_convex(&poly) {
            trace!(index, vertices = poly.len(), "contour not convex");
            return None;
        }

        Some((poly, area))
    }

    /// Vertex count and corner angle gate.
    fn accept(&self, index: usize, poly: &[Point2i], area: f64) -> Option<QuadCandidate> {
        if poly.len() != 4 {
            trace!(index, vertices = poly.len(), "not a quadrilateral");
            return None;
        }

        let mut cosines = vertex_cosines(poly);
        cosines.sort_by(f64::total_cmp);
        let min_cos = cosines[0];
        let max_cos = cosines[cosines.len() - 1];

        if min_cos < self.options.min_cos || max_cos > self.options.max_cos {
            trace!(index, min_cos, max_cos, "corner angles out of range");
            return None;
        }

        let corner = |i: usize| Point2f::new(poly[i].x as f32, poly[i].y as f32);
        Some(QuadCandidate {
            corners: [corner(0), corner(1), corner(2), corner(3)],
            area,
            min_cos,
            max_cos,
        })
    }
}
