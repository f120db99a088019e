use crate::{ImageView, Point2i};

/// Fills the destination array with a 1-pixel padded zero-border around the source image,
/// and converts source pixels (0 -> 0, anything else -> 1).
///
/// # Arguments
/// * `src` - The source `ImageView`.
/// * `dst` - The destination slice, which MUST be allocated to hold the
///   `(width + 2) * (height + 2)` zero-padded array.
///
/// # Returns
/// A reference to the modified destination slice.
pub fn binary_border<'a>(src: &ImageView, dst: &'a mut [i32]) -> &'a [i32] {
    let width = src.width as usize;
    let padded = width + 2;

    dst[..padded].fill(0);
    for (row, chunk) in src.data.chunks_exact(width.max(1)).take(src.height as usize).enumerate() {
        let line = &mut dst[(row + 1) * padded..(row + 2) * padded];
        line[0] = 0;
        for (d, &s) in line[1..=width].iter_mut().zip(chunk) {
            *d = i32::from(s != 0);
        }
        line[padded - 1] = 0;
    }
    let bottom = (src.height as usize + 1) * padded;
    dst[bottom..bottom + padded].fill(0);

    dst
}

/// Constant offsets for 8-directional sweeping (x, y).
pub const NEIGHBORHOOD: [[i32; 2]; 8] = [
    [1, 0],
    [1, -1],
    [0, -1],
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, 1],
    [1, 1],
];

/// Flattened offsets for the 8 neighbours given a padded row width,
/// duplicated so a sweep may run past index 7 without wrapping.
pub fn neighborhood_deltas(width: i32) -> [i32; 16] {
    let mut deltas = [0i32; 16];
    for (i, n) in NEIGHBORHOOD.iter().enumerate() {
        let delta = n[0] + n[1] * width;
        deltas[i] = delta;
        deltas[i + 8] = delta;
    }
    deltas
}

/// A single traced boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Boundary pixels in tracing order.
    pub points: Vec<Point2i>,
    /// Whether this contour bounds a hole inside another component.
    pub hole: bool,
    /// Index of the enclosing contour in the traced list; `None` for the image frame.
    pub parent: Option<usize>,
}

impl Contour {
    /// Outer border of a component that no other component encloses.
    pub fn is_external(&self) -> bool {
        !self.hole && self.parent.is_none()
    }
}

/// Suzuki-Abe single border trace.
///
/// # Arguments
/// * `src` - Padded label image. Overwritten with the border label during the trace.
/// * `pos` - Index of the starting pixel in `src`.
/// * `nbd` - Label of the border being traced.
/// * `point` - Image coordinates of the starting pixel.
/// * `hole` - True if tracing the border of a hole.
/// * `deltas` - Neighbour offsets from [`neighborhood_deltas`].
///
/// # Returns
/// The boundary pixels, starting at `point`.
pub fn border_following(
    src: &mut [i32],
    pos: usize,
    nbd: i32,
    mut point: Point2i,
    hole: bool,
    deltas: &[i32; 16],
) -> Vec<Point2i> {
    let mut points = Vec::new();

    let mut s: usize = if hole { 0 } else { 4 };
    let mut s_end = s;
    let mut pos1;
    let mut pos3;
    let mut pos4;

    // Search clockwise for the first non-zero neighbour.
    loop {
        s = s.wrapping_sub(1) & 7;
        pos1 = (pos as isize + deltas[s] as isize) as usize;
        if src[pos1] != 0 {
            break;
        }
        if s == s_end {
            break;
        }
    }

    if s == s_end {
        // Isolated pixel.
        src[pos] = -nbd;
        points.push(point);
        return points;
    }

    pos3 = pos;
    loop {
        s_end = s;

        loop {
            s = (s + 1) & 15;
            pos4 = (pos3 as isize + deltas[s] as isize) as usize;
            if src[pos4] != 0 {
                break;
            }
        }

        s &= 7;

        // The east neighbour was examined as a 0-pixel iff the sweep wrapped past it.
        if s.wrapping_sub(1) < s_end {
            src[pos3] = -nbd;
        } else if src[pos3] == 1 {
            src[pos3] = nbd;
        }

        points.push(point);

        point.x += NEIGHBORHOOD[s][0];
        point.y += NEIGHBORHOOD[s][1];

        if pos4 == pos && pos3 == pos1 {
            break;
        }

        pos3 = pos4;
        s = (s + 4) & 7;
    }

    points
}

/// Suzuki-Abe topological border following over a binary image.
///
/// Every outer border and hole border is traced in raster order; the
/// enclosing border of each is recorded in [`Contour::parent`].
///
/// # Arguments
/// * `src_img` - Binary image (0 = background, anything else = foreground).
/// * `binary` - Scratch buffer of `(width + 2) * (height + 2)` labels.
pub fn find_contours(src_img: &ImageView, binary: &mut [i32]) -> Vec<Contour> {
    let width = src_img.width as usize;
    let height = src_img.height as usize;
    let mut contours: Vec<Contour> = Vec::new();
    if width == 0 || height == 0 {
        return contours;
    }

    binary_border(src_img, binary);
    let deltas = neighborhood_deltas((width + 2) as i32);

    let mut pos = width + 3; // first interior pixel
    let mut nbd = 1;

    for i in 0..height {
        // Label 1 stands for the image frame, which acts as a hole border.
        let mut lnbd = 1;

        for j in 0..width {
            let pix = binary[pos];

            if pix != 0 {
                let outer = pix == 1 && binary[pos - 1] == 0;
                let hole = !outer && pix >= 1 && binary[pos + 1] == 0;

                if hole && pix > 1 {
                    lnbd = pix;
                }

                if outer || hole {
                    nbd += 1;

                    let (last_hole, last_parent, last_index) = if lnbd == 1 {
                        (true, None, None)
                    } else {
                        let idx = (lnbd - 2) as usize;
                        (contours[idx].hole, contours[idx].parent, Some(idx))
                    };
                    // Same border kind -> siblings share a parent; otherwise
                    // the last border encloses the new one.
                    let parent = if hole == last_hole {
                        last_parent
                    } else {
                        last_index
                    };

                    let point = Point2i::new(j as i32, i as i32);
                    let points = border_following(binary, pos, nbd, point, hole, &deltas);
                    contours.push(Contour {
                        points,
                        hole,
                        parent,
                    });
                }

                let label = binary[pos];
                if label != 1 && label != 0 {
                    lnbd = label.abs();
                }
            }

            pos += 1;
        }
        pos += 2; // right border + left border of the next row
    }

    contours
}

/// Drops boundary points that lie in the middle of a straight run of unit
/// steps, keeping only the points where the chain changes direction.
pub fn compress_chain(points: &[Point2i]) -> Vec<Point2i> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            cur - prev != next - cur
        })
        .map(|i| points[i])
        .collect()
}

/// Outermost boundaries only (holes and enclosed components are skipped),
/// chain-compressed, most recently traced first: the lowest component in
/// the frame comes out ahead of the ones above it.
pub fn find_external_contours(src_img: &ImageView, binary: &mut [i32]) -> Vec<Vec<Point2i>> {
    find_contours(src_img, binary)
        .into_iter()
        .rev()
        .filter(Contour::is_external)
        .map(|c| compress_chain(&c.points))
        .collect()
}

/// Scratch buffer length needed by [`find_contours`].
pub fn scratch_len(width: u32, height: u32) -> usize {
    (width as usize + 2) * (height as usize + 2)
}
