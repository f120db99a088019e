// src/simd/wasm.rs

use crate::cv::scalar::{sobel_rows, sobel_span, ScalarCV};
use crate::cv::ComputerVision;
use crate::ImageView;

#[cfg(target_feature = "simd128")]
use core::arch::wasm32::*;

/// WASM SIMD implementation of Computer Vision operations.
pub struct WasmCV;

#[cfg(target_feature = "simd128")]
#[inline(always)]
fn load(bytes: &[u8]) -> v128 {
    let lanes = &bytes[..16];
    // SAFETY: `lanes` is 16 readable bytes; v128_load tolerates unaligned pointers.
    unsafe { v128_load(lanes.as_ptr() as *const v128) }
}

#[cfg(target_feature = "simd128")]
#[inline(always)]
fn store(dst: &mut [u8], v: v128) {
    let lanes = &mut dst[..16];
    // SAFETY: `lanes` is 16 writable bytes; v128_store tolerates unaligned pointers.
    unsafe { v128_store(lanes.as_mut_ptr() as *mut v128, v) }
}

#[cfg(target_feature = "simd128")]
#[inline(always)]
fn taps(row: &[u8], x: usize) -> [[v128; 3]; 2] {
    let m = load(&row[x - 1..]);
    let c = load(&row[x..]);
    let p = load(&row[x + 1..]);
    [
        [
            u16x8_extend_low_u8x16(m),
            u16x8_extend_low_u8x16(c),
            u16x8_extend_low_u8x16(p),
        ],
        [
            u16x8_extend_high_u8x16(m),
            u16x8_extend_high_u8x16(c),
            u16x8_extend_high_u8x16(p),
        ],
    ]
}

#[cfg(target_feature = "simd128")]
#[inline(always)]
fn sobel_lanes(t0: [v128; 3], t1: [v128; 3], t2: [v128; 3]) -> v128 {
    let sat = i16x8_splat(255);
    let one = i16x8_splat(1);

    let d1 = i16x8_sub(t1[2], t1[0]);
    let gx = i16x8_add(
        i16x8_add(i16x8_sub(t0[2], t0[0]), i16x8_sub(t2[2], t2[0])),
        i16x8_add(d1, d1),
    );
    let s0 = i16x8_add(i16x8_add(t0[0], t0[2]), i16x8_add(t0[1], t0[1]));
    let s2 = i16x8_add(i16x8_add(t2[0], t2[2]), i16x8_add(t2[1], t2[1]));
    let gy = i16x8_sub(s2, s0);

    let ax = i16x8_min(i16x8_abs(gx), sat);
    let ay = i16x8_min(i16x8_abs(gy), sat);
    u16x8_shr(i16x8_add(i16x8_add(ax, ay), one), 1)
}

impl ComputerVision for WasmCV {
    fn grayscale(src: &ImageView, dst: &mut [u8]) {
        ScalarCV::grayscale(src, dst)
    }

    fn sobel_edges(src: &ImageView, dst: &mut [u8]) {
        let width = src.width as usize;
        let height = src.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        for (y, dst_row) in dst.chunks_exact_mut(width).take(height).enumerate() {
            let rows = sobel_rows(src, y);

            #[cfg(target_feature = "simd128")]
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
                        store(&mut dst_row[x..], u8x16_narrow_i16x8(lo, hi));
                        x += 16;
                    }
                }
                sobel_span(rows, dst_row, x..width);
            }

            #[cfg(not(target_feature = "simd128"))]
            sobel_span(rows, dst_row, 0..width);
        }
    }

    /// Applies a binary threshold to a grayscale image.
    fn threshold(src: &[u8], dst: &mut [u8], threshold: u8) {
        let len = src.len();
        let mut i = 0;

        #[cfg(target_feature = "simd128")]
        {
            let level = u8x16_splat(threshold);

            while i + 15 < len {
                // 0xFF where data >= level, 0x00 otherwise
                let ge = u8x16_ge(load(&src[i..]), level);
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
