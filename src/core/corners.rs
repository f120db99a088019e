// src/core/corners.rs

use crate::{Point2f, QuadCorners};
use serde::Serialize;

/// Four corners in drawing order, implicitly closed back to the first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathResult {
    pub points: QuadCorners,
}

impl PathResult {
    /// The outline always returns to its first point.
    pub fn closed(&self) -> bool {
        true
    }

    /// The four edges of the outline, ending with the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Point2f, Point2f)> + '_ {
        (0..4).map(move |i| (self.points[i], self.points[(i + 1) % 4]))
    }

    /// Same path with every point multiplied by `ratio`.
    pub fn scaled(&self, ratio: f32) -> PathResult {
        PathResult {
            points: self.points.map(|p| p * ratio),
        }
    }
}

/// Maps points into another coordinate space by a uniform factor.
pub fn scale_points(points: &[Point2f], ratio: f32) -> Vec<Point2f> {
    points.iter().map(|p| p * ratio).collect()
}

fn origin_distance(p: &Point2f) -> f64 {
    (p.x as f64).hypot(p.y as f64)
}

/// Orders four corners into an outline.
///
/// Points are ranked by distance from the origin and emitted as ranks
/// `0, 1, 3, 2`. Equal distances fall back to `x`, then `y`, so the ranking
/// never depends on input order and feeding the result back in returns the
/// same path. For an upright rectangle this walks the border without
/// crossing the diagonal.
///
/// Any count other than four yields `None`.
pub fn order_corners(points: &[Point2f]) -> Option<PathResult> {
    if points.len() != 4 {
        return None;
    }

    let mut ranked: Vec<Point2f> = points.to_vec();
    ranked.sort_by(|a, b| {
        origin_distance(a)
            .total_cmp(&origin_distance(b))
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    });

    Some(PathResult {
        points: [ranked[0], ranked[1], ranked[3], ranked[2]],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2f {
        Point2f::new(x, y)
    }

    #[test]
    fn test_rectangle_order() {
        let path = order_corners(&[p(100.0, 10.0), p(10.0, 10.0), p(100.0, 80.0), p(10.0, 80.0)]).unwrap();
        assert_eq!(path.points, [p(10.0, 10.0), p(10.0, 80.0), p(100.0, 80.0), p(100.0, 10.0)]);
        assert!(path.closed());
    }

    #[test]
    fn test_permutation_is_fixed() {
        // Already ranked by distance: r0..r3.
        let ranked = [p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0), p(4.0, 0.0)];
        let path = order_corners(&ranked).unwrap();
        assert_eq!(path.points, [ranked[0], ranked[1], ranked[3], ranked[2]]);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            [p(100.0, 10.0), p(10.0, 10.0), p(100.0, 80.0), p(10.0, 80.0)],
            [p(50.0, 5.0), p(90.0, 50.0), p(50.0, 95.0), p(5.0, 50.0)],
            [p(3.0, 4.0), p(4.0, 3.0), p(0.0, 5.0), p(30.0, 40.0)],
            // The two farthest corners are equidistant.
            [p(0.0, 0.0), p(1.0, 0.0), p(3.0, 4.0), p(5.0, 0.0)],
            [p(0.0, 0.0), p(1.0, 0.0), p(5.0, 0.0), p(3.0, 4.0)],
        ];
        for input in &inputs {
            let once = order_corners(input).unwrap();
            let twice = order_corners(&once.points).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_equal_distances_break_on_coordinates() {
        let expected = [p(0.0, 5.0), p(3.0, 4.0), p(30.0, 40.0), p(4.0, 3.0)];
        let inputs = [
            [p(3.0, 4.0), p(4.0, 3.0), p(0.0, 5.0), p(30.0, 40.0)],
            [p(4.0, 3.0), p(30.0, 40.0), p(3.0, 4.0), p(0.0, 5.0)],
        ];
        for input in &inputs {
            assert_eq!(order_corners(input).unwrap().points, expected);
        }

        let tied_far = order_corners(&[p(0.0, 0.0), p(1.0, 0.0), p(3.0, 4.0), p(5.0, 0.0)]).unwrap();
        assert_eq!(tied_far.points, [p(0.0, 0.0), p(1.0, 0.0), p(5.0, 0.0), p(3.0, 4.0)]);
    }

    #[test]
    fn test_wrong_counts() {
        for n in [0usize, 1, 3, 5] {
            let points = vec![p(1.0, 1.0); n];
            assert_eq!(order_corners(&points), None, "count {n}");
        }
    }

    #[test]
    fn test_segments_close_the_outline() {
        let path = order_corners(&[p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0), p(10.0, 10.0)]).unwrap();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].1, path.points[0]);
        for w in segments.windows(2) {
            assert_eq!(w[0].1, w[1].0);
        }
    }

    #[test]
    fn test_scaling() {
        let scaled = scale_points(&[p(1.0, 2.0), p(-3.0, 0.5)], 2.0);
        assert_eq!(scaled, vec![p(2.0, 4.0), p(-6.0, 1.0)]);

        let path = PathResult {
            points: [p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)],
        };
        assert_eq!(path.scaled(0.5).points[2], p(1.0, 1.0));
    }
}
