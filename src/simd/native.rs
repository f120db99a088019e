// src/simd/native.rs

use crate::cv::scalar::{sobel_rows, sobel_span, ScalarCV};
use crate::cv::ComputerVision;
use crate::ImageView;

#[cfg(target_arch = "x86_64")]
use safe_arch::*;

/// Native SIMD implementation of Computer Vision operations.
pub struct NativeCV;

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn load(bytes: &[u8]) -> m128i {
    let mut lanes = [0u8; 16];
    lanes.copy_from_slice(&bytes[..16]);
    load_unaligned_m128i(&lanes)
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn store(dst: &mut [u8], v: m128i) {
    let mut lanes = [0u8; 16];
    store_unaligned_m128i(&mut lanes, v);
    dst[..16].copy_from_slice(&lanes);
}

/// Left, centre and right neighbours of 16 pixels starting at `x`, widened
/// to i16 and split into low and high halves.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn taps(row: &[u8], x: usize) -> [[m128i; 3]; 2] {
    let zero = zeroed_m128i();
    let m = load(&row[x - 1..]);
    let c = load(&row[x..]);
    let p = load(&row[x + 1..]);
    [
        [
            unpack_low_i8_m128i(m, zero),
            unpack_low_i8_m128i(c, zero),
            unpack_low_i8_m128i(p, zero),
        ],
        [
            unpack_high_i8_m128i(m, zero),
            unpack_high_i8_m128i(c, zero),
            unpack_high_i8_m128i(p, zero),
        ],
    ]
}

/// Eight Sobel magnitudes from the taps of the three rows.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn sobel_lanes(t0: [m128i; 3], t1: [m128i; 3], t2: [m128i; 3]) -> m128i {
    let zero = zeroed_m128i();
    let sat = set_splat_i16_m128i(255);
    let one = set_splat_i16_m128i(1);

    let d0 = sub_i16_m128i(t0[2], t0[0]);
    let d1 = sub_i16_m128i(t1[2], t1[0]);
    let d2 = sub_i16_m128i(t2[2], t2[0]);
    let gx = add_i16_m128i(add_i16_m128i(d0, d2), add_i16_m128i(d1, d1));

    let s0 = add_i16_m128i(add_i16_m128i(t0[0], t0[2]), add_i16_m128i(t0[1], t0[1]));
    let s2 = add_i16_m128i(add_i16_m128i(t2[0], t2[2]), add_i16_m128i(t2[1], t2[1]));
    let gy = sub_i16_m128i(s2, s0);

    let ax = min_i16_m128i(max_i16_m128i(gx, sub_i16_m128i(zero, gx)), sat);
    let ay = min_i16_m128i(max_i16_m128i(gy, sub_i16_m128i(zero, gy)), sat);

    shr_imm_u16_m128i::<1>(add_i16_m128i(add_i16_m128i(ax, ay), one))
}

impl ComputerVision for NativeCV {
    /// Delegates to the scalar path: the float weights need exact parity and
    /// the interleaved RGB layout makes lane shuffles slower than the loop.
    fn grayscale(src: &ImageView, dst: &mut [u8]) {
        ScalarCV::grayscale(src, dst)
    }

    /// Interior columns are processed 16 at a time; the reflected border
    /// columns and the tail go through the scalar kernel.
    fn sobel_edges(src: &ImageView, dst: &mut [u8]) {
        let width = src.width as usize;
        let height = src.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        for (y, dst_row) in dst.chunks_exact_mut(width).take(height).enumerate() {
            let rows = sobel_rows(src, y);

            #[cfg(target_arch = "x86_64")]
            {
                let mut x = 0;
                if width >= 18 {
                    sobel_span(rows, dst_row, 0..1);
                    x = 1;
                    while x + 17 <= width {
                        let [r0_lo, r0_hi] = taps(rows[0], x);
                        let [r1_lo, r1_hi] = taps(rows[1], x);
                        let [r2_lo, r2_hi] = taps(rows[2], x);

                        let lo = sobel_lanes(r0_lo, r1_lo, r2_lo);
                        let hi = sobel_lanes(r0_hi, r1_hi, r2_hi);
                        store(&mut dst_row[x..], pack_i16_to_u8_m128i(lo, hi));
                        x += 16;
                    }
                }
                sobel_span(rows, dst_row, x..width);
            }

            #[cfg(not(target_arch = "x86_64"))]
            sobel_span(rows, dst_row, 0..width);
        }
    }

    /// Applies a binary threshold to a grayscale image.
    fn threshold(src: &[u8], dst: &mut [u8], threshold: u8) {
        let len = src.len();
        let mut i = 0;

        #[cfg(target_arch = "x86_64")]
        {
            // SSE2 only compares signed bytes; `max(v, t) == v` is the
            // unsigned `v >= t`.
            let level = set_splat_i8_m128i(threshold as i8);

            while i + 15 < len {
                let data = load(&src[i..]);
                let ge = cmp_eq_mask_i8_m128i(max_u8_m128i(data, level), data);
                store(&mut dst[i..], ge);
                i += 16;
            }
        }

        // Process remaining pixels
        while i < len {
            dst[i] = if src[i] >= threshold { 255 } else { 0 };
            i += 1;
        }
    }
}
