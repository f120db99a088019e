// src/cv/geometry.rs

use crate::Point2i;

#[derive(Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

#[inline]
fn dist_sq(a: Point2i, b: Point2i) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx * dx + dy * dy
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The split anchor is found by three rounds of farthest-point search, the
/// two resulting arcs are refined with an explicit stack, and a second pass
/// then drops vertices lying within `epsilon` of the chord joining their
/// neighbours.
///
/// # Arguments
/// * `contour` - The input boundary points, implicitly closed.
/// * `epsilon` - Maximum distance between the contour and its approximation.
///
/// # Returns
/// The approximated polygon, starting at the split anchor.
pub fn approx_poly_dp(contour: &[Point2i], epsilon: f64) -> Vec<Point2i> {
    let len = contour.len();
    if len == 0 {
        return Vec::new();
    }
    let epsilon_sq = epsilon * epsilon;

    let mut anchor = 0;
    let mut far = 0;
    let mut max_dist = 0.0;
    for _ in 0..3 {
        anchor = (anchor + far) % len;
        far = 0;
        max_dist = 0.0;
        let start_pt = contour[anchor];
        for j in 1..len {
            let dist = dist_sq(contour[(anchor + j) % len], start_pt);
            if dist > max_dist {
                max_dist = dist;
                far = j;
            }
        }
    }

    if max_dist <= epsilon_sq {
        return vec![contour[anchor]];
    }

    let mut poly = Vec::new();
    let split = anchor + far;
    let mut stack = vec![
        Span {
            start: split % len,
            end: if anchor < split % len { anchor + len } else { anchor },
        },
        Span {
            start: anchor,
            end: split,
        },
    ];

    while let Some(span) = stack.pop() {
        let start_pt = contour[span.start % len];

        if span.end <= span.start + 1 {
            poly.push(start_pt);
            continue;
        }

        let end_pt = contour[span.end % len];
        let dx = (end_pt.x - start_pt.x) as f64;
        let dy = (end_pt.y - start_pt.y) as f64;

        let mut max_dev = 0.0;
        let mut split = span.start;
        for i in (span.start + 1)..span.end {
            let pt = contour[i % len];
            let dev = ((pt.y - start_pt.y) as f64 * dx - (pt.x - start_pt.x) as f64 * dy).abs();
            if dev > max_dev {
                max_dev = dev;
                split = i;
            }
        }

        if max_dev * max_dev <= epsilon_sq * (dx * dx + dy * dy) {
            poly.push(start_pt);
        } else {
            stack.push(Span {
                start: split,
                end: span.end,
            });
            stack.push(Span {
                start: span.start,
                end: split,
            });
        }
    }

    drop_near_chord(&mut poly, epsilon_sq);
    poly
}

/// Second simplification pass: a vertex whose distance to the chord between
/// its neighbours is within `epsilon / sqrt(2)` is merged away, provided the
/// chord is not axis aligned and the vertex lies between its neighbours.
fn drop_near_chord(poly: &mut Vec<Point2i>, epsilon_sq: f64) {
    let count = poly.len();
    if count <= 2 {
        return;
    }

    fn read(poly: &[Point2i], pos: &mut usize) -> Point2i {
        let pt = poly[*pos];
        *pos = (*pos + 1) % poly.len();
        pt
    }

    let mut new_count = count;
    let mut pos = count - 1;

    let mut start_pt = read(poly, &mut pos);
    let mut wpos = pos;
    let mut pt = read(poly, &mut pos);

    let mut i = 0;
    while i < count && new_count > 2 {
        let end_pt = read(poly, &mut pos);

        let dx = (end_pt.x - start_pt.x) as f64;
        let dy = (end_pt.y - start_pt.y) as f64;
        let dist = ((pt.x - start_pt.x) as f64 * dy - (pt.y - start_pt.y) as f64 * dx).abs();
        let inner = (pt.x - start_pt.x) as f64 * (end_pt.x - pt.x) as f64
            + (pt.y - start_pt.y) as f64 * (end_pt.y - pt.y) as f64;

        if dist * dist <= 0.5 * epsilon_sq * (dx * dx + dy * dy) && dx != 0.0 && dy != 0.0 && inner >= 0.0 {
            new_count -= 1;
            poly[wpos] = end_pt;
            start_pt = end_pt;
            wpos = (wpos + 1) % count;
            pt = read(poly, &mut pos);
            i += 2;
            continue;
        }

        poly[wpos] = pt;
        start_pt = pt;
        wpos = (wpos + 1) % count;
        pt = end_pt;
        i += 1;
    }

    poly.truncate(new_count);
}

/// Closed perimeter length of a contour.
pub fn perimeter(poly: &[Point2i]) -> f64 {
    let len = poly.len();
    if len == 0 {
        return 0.0;
    }

    let mut p = 0.0;
    let mut j = len - 1;
    for i in 0..len {
        p += dist_sq(poly[i], poly[j]).sqrt();
        j = i;
    }
    p
}

/// Signed polygon area (shoelace). Positive for clockwise contours in
/// image coordinates (y pointing down).
pub fn contour_area(poly: &[Point2i]) -> f64 {
    let len = poly.len();
    if len < 3 {
        return 0.0;
    }

    let mut twice = 0i64;
    let mut j = len - 1;
    for i in 0..len {
        twice += poly[j].x as i64 * poly[i].y as i64 - poly[i].x as i64 * poly[j].y as i64;
        j = i;
    }
    twice as f64 / 2.0
}

/// Tests if the polygon is strictly convex. Collinear consecutive edges
/// count as non-convex.
pub fn is_contour_convex(contour: &[Point2i]) -> bool {
    let len = contour.len();
    if len == 0 {
        return false;
    }

    let mut orientation = 0;
    let mut prev = contour[len - 1];
    let mut d0 = contour[0] - prev;
    prev = contour[0];

    for k in 1..=len {
        let cur = contour[k % len];
        let d = cur - prev;

        // i64 prevents cross-product overflow on large coordinates
        let dxdy0 = d.x as i64 * d0.y as i64;
        let dydx0 = d.y as i64 * d0.x as i64;

        orientation |= if dydx0 > dxdy0 {
            1
        } else if dydx0 < dxdy0 {
            2
        } else {
            3
        };
        if orientation == 3 {
            return false;
        }

        d0 = d;
        prev = cur;
    }

    true
}

/// Cosine of the angle at `pt0` between the rays towards `pt1` and `pt2`.
pub fn angle_cosine(pt1: Point2i, pt2: Point2i, pt0: Point2i) -> f64 {
    let dx1 = (pt1.x - pt0.x) as f64;
    let dy1 = (pt1.y - pt0.y) as f64;
    let dx2 = (pt2.x - pt0.x) as f64;
    let dy2 = (pt2.y - pt0.y) as f64;
    (dx1 * dx2 + dy1 * dy2) / ((dx1 * dx1 + dy1 * dy1) * (dx2 * dx2 + dy2 * dy2) + 1e-10).sqrt()
}

/// Corner angle cosines of a closed polygon, one per vertex, in vertex order.
pub fn vertex_cosines(poly: &[Point2i]) -> Vec<f64> {
    let n = poly.len();
    (0..n)
        .map(|i| angle_cosine(poly[(i + 1) % n], poly[(i + n - 1) % n], poly[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point2i;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point2i> {
        raw.iter().map(|&(x, y)| Point2i::new(x, y)).collect()
    }

    #[test]
    fn test_is_contour_convex() {
        let square = pts(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert!(is_contour_convex(&square));

        let concave = pts(&[(0, 0), (2, 0), (2, 1), (1, 1), (1, 2), (0, 2)]);
        assert!(!is_contour_convex(&concave));

        // Arrow head: four vertices, one reflex.
        let arrow = pts(&[(0, 0), (10, 5), (0, 10), (3, 5)]);
        assert!(!is_contour_convex(&arrow));
    }

    #[test]
    fn test_perimeter_and_area() {
        let square = pts(&[(0, 0), (4, 0), (4, 3), (0, 3)]);
        assert!((perimeter(&square) - 14.0).abs() < 1e-9);
        assert!((contour_area(&square) - 12.0).abs() < 1e-9);

        let reversed: Vec<Point2i> = square.iter().rev().copied().collect();
        assert!((contour_area(&reversed) + 12.0).abs() < 1e-9);

        assert_eq!(contour_area(&pts(&[(0, 0), (5, 5)])), 0.0);
    }

    #[test]
    fn test_approx_poly_dp() {
        // Square with extra points
        let contour = pts(&[
            (0, 0),
            (1, 0),
            (10, 0),
            (10, 1),
            (10, 10),
            (9, 10),
            (0, 10),
            (0, 9),
        ]);

        let poly = approx_poly_dp(&contour, 2.0);
        assert_eq!(poly.len(), 4);
        for corner in pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]) {
            assert!(poly.contains(&corner));
        }
    }

    #[test]
    fn test_approx_poly_dp_small_contour_collapses() {
        let blob = pts(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert_eq!(approx_poly_dp(&blob, 5.0).len(), 1);
        assert!(approx_poly_dp(&[], 1.0).is_empty());
    }

    #[test]
    fn test_vertex_cosines() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let cos = vertex_cosines(&square);
        assert_eq!(cos.len(), 4);
        assert!(cos.iter().all(|c| c.abs() < 1e-9));

        // 60 degree corner
        let c = angle_cosine(Point2i::new(10, 0), Point2i::new(5, 9), Point2i::new(0, 0));
        assert!((c - 0.485).abs() < 0.01);
    }
}
