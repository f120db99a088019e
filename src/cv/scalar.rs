// src/cv/scalar.rs
#![allow(clippy::needless_range_loop)]

use crate::cv::ComputerVision;
use crate::ImageView;
use std::ops::Range;

/// Scalar (non-SIMD) implementation of Computer Vision operations.
pub struct ScalarCV;

/// Reflect-101 border index: `-1 -> 1`, `n -> n - 2`.
#[inline]
pub(crate) fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let r = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    r as usize
}

/// Saturating absolute value of a 16-bit derivative.
#[inline]
fn abs_u8(v: i16) -> u16 {
    v.unsigned_abs().min(255)
}

/// The three source rows feeding output row `y`, reflected at the borders.
#[inline]
pub(crate) fn sobel_rows<'a>(src: &ImageView<'a>, y: usize) -> [&'a [u8]; 3] {
    let width = src.width as usize;
    let height = src.height as usize;
    let data = src.data;
    [
        &data[reflect101(y as isize - 1, height) * width..][..width],
        &data[y * width..][..width],
        &data[reflect101(y as isize + 1, height) * width..][..width],
    ]
}

/// Scalar Sobel magnitude for the columns `xs` of one row. The SIMD paths
/// use it for the border columns and the tail.
pub(crate) fn sobel_span(rows: [&[u8]; 3], dst_row: &mut [u8], xs: Range<usize>) {
    let [r0, r1, r2] = rows;
    let width = r1.len();

    for x in xs {
        let xm = reflect101(x as isize - 1, width);
        let xp = reflect101(x as isize + 1, width);

        let gx = (r0[xp] as i16 - r0[xm] as i16)
            + 2 * (r1[xp] as i16 - r1[xm] as i16)
            + (r2[xp] as i16 - r2[xm] as i16);
        let gy = (r2[xm] as i16 + 2 * r2[x] as i16 + r2[xp] as i16)
            - (r0[xm] as i16 + 2 * r0[x] as i16 + r0[xp] as i16);

        // 0.5 * |gx| + 0.5 * |gy|, ties rounded up
        dst_row[x] = ((abs_u8(gx) + abs_u8(gy) + 1) >> 1) as u8;
    }
}

impl ComputerVision for ScalarCV {
    /// Converts an RGB image buffer to grayscale.
    fn grayscale(src: &ImageView, dst: &mut [u8]) {
        let src_data = src.data;
        let mut i = 0;
        let mut j = 0;
        let len = src_data.len();

        while i + 2 < len {
            let r = src_data[i] as f32;
            let g = src_data[i + 1] as f32;
            let b = src_data[i + 2] as f32;

            // Weighted average: 0.299R + 0.587G + 0.114B
            dst[j] = ((r * 0.299 + g * 0.587 + b * 0.114 + 0.5) as u32).min(255) as u8;
            j += 1;
            i += 3;
        }
    }

    fn sobel_edges(src: &ImageView, dst: &mut [u8]) {
        let width = src.width as usize;
        let height = src.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        for (y, dst_row) in dst.chunks_exact_mut(width).take(height).enumerate() {
            sobel_span(sobel_rows(src, y), dst_row, 0..width);
        }
    }

    /// Applies a simple threshold using a lookup table.
    fn threshold(src: &[u8], dst: &mut [u8], threshold: u8) {
        let len = src.len();
        let mut tab = [0u8; 256];

        // Build lookup table
        for i in 0..256 {
            tab[i] = if (i as u8) >= threshold { 255 } else { 0 };
        }

        // Apply threshold using lookup
        for i in 0..len {
            dst[i] = tab[src[i] as usize];
        }
    }
}
