//! YUV 4:2:0 semi-planar decoding with the fixed sensor orientation fix.
//!
//! Camera sensors on handheld devices are mounted in landscape, so every
//! decoded frame is transposed and flipped horizontally (a 90° clockwise
//! rotation). The correction is written straight into the destination
//! buffer while decoding, so no intermediate RGB image is allocated.

use crate::{ImageView, RectDetectError, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Order of the interleaved chroma samples following the luma plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromaOrder {
    /// NV21: V then U. Default output of Android camera previews.
    #[default]
    Vu,
    /// NV12: U then V.
    Uv,
}

// BT.601 limited range, 20-bit fixed point.
const SHIFT: i32 = 20;
const HALF: i32 = 1 << (SHIFT - 1);
const CY: i32 = 1_220_542;
const CVR: i32 = 1_673_527;
const CVG: i32 = -852_492;
const CUG: i32 = -409_993;
const CUB: i32 = 2_116_026;

#[inline]
fn clamp_u8(v: i32) -> u8 {
    ((v + HALF) >> SHIFT).clamp(0, 255) as u8
}

/// Converts one YUV sample triple to RGB.
#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let luma = (y as i32 - 16).max(0) * CY;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    [
        clamp_u8(luma + CVR * e),
        clamp_u8(luma + CVG * e + CUG * d),
        clamp_u8(luma + CUB * d),
    ]
}

/// Expected byte length of a 4:2:0 semi-planar frame: a full-resolution
/// luma plane plus half as many interleaved chroma bytes.
pub fn yuv420sp_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3 / 2
}

/// Decodes a YUV 4:2:0 semi-planar frame into an orientation-corrected RGB image.
///
/// The output is `height x width` (sides swapped): output pixel `(x, y)`
/// takes the colour of input pixel `(y, height - 1 - x)`.
///
/// # Errors
/// * [`RectDetectError::InvalidDimensions`] for zero or odd sides.
/// * [`RectDetectError::InvalidFrameData`] when the buffer length is not
///   `width * height * 3 / 2`.
pub fn yuv420sp_to_rgb(src: &ImageView, order: ChromaOrder) -> Result<RgbImage> {
    let width = src.width as usize;
    let height = src.height as usize;
    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(RectDetectError::InvalidDimensions {
            width: src.width,
            height: src.height,
        });
    }

    let expected = yuv420sp_len(src.width, src.height);
    if src.data.len() != expected {
        return Err(RectDetectError::InvalidFrameData {
            expected,
            actual: src.data.len(),
        });
    }

    let (luma, chroma) = src.data.split_at(src.pixel_count());
    let (u_off, v_off) = match order {
        ChromaOrder::Vu => (1, 0),
        ChromaOrder::Uv => (0, 1),
    };

    // Output is `height` pixels wide and `width` pixels tall.
    let out_w = height;
    let mut out = vec![0u8; src.pixel_count() * 3];

    for y in 0..height {
        let luma_row = &luma[y * width..(y + 1) * width];
        let chroma_row = &chroma[(y / 2) * width..(y / 2 + 1) * width];
        let dx = height - 1 - y;

        for x in 0..width {
            let pair = x & !1;
            let rgb = yuv_to_rgb(
                luma_row[x],
                chroma_row[pair + u_off],
                chroma_row[pair + v_off],
            );

            let pos = (x * out_w + dx) * 3;
            out[pos..pos + 3].copy_from_slice(&rgb);
        }
    }

    RgbImage::from_raw(src.height, src.width, out).ok_or(RectDetectError::StageFailure {
        stage: "color",
        reason: "decoded buffer does not match output size".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_frame(width: usize, height: usize, luma: impl Fn(usize, usize) -> u8) -> Vec<u8> {
        let mut data = vec![128u8; width * height * 3 / 2];
        for y in 0..height {
            for x in 0..width {
                data[y * width + x] = luma(x, y);
            }
        }
        data
    }

    #[test]
    fn test_frame_length_follows_pixel_count() {
        let data = neutral_frame(6, 4, |_, _| 16);
        let view = ImageView {
            data: &data,
            width: 6,
            height: 4,
        };
        assert_eq!(view.pixel_count(), 24);
        assert_eq!(yuv420sp_len(6, 4), 36);
        assert_eq!(data.len(), yuv420sp_len(view.width, view.height));

        let rgb = yuv420sp_to_rgb(&view, ChromaOrder::Vu).unwrap();
        assert_eq!(rgb.as_raw().len(), view.pixel_count() * 3);
    }

    #[test]
    fn test_yuv_to_rgb_reference_values() {
        assert_eq!(yuv_to_rgb(128, 128, 128), [130, 130, 130]);
        assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
        assert_eq!(yuv_to_rgb(235, 128, 128), [255, 255, 255]);
        // BT.601 red
        assert_eq!(yuv_to_rgb(81, 90, 240), [254, 0, 0]);
    }

    #[test]
    fn test_dimensions_are_swapped() {
        let data = neutral_frame(6, 4, |_, _| 128);
        let view = ImageView {
            data: &data,
            width: 6,
            height: 4,
        };
        let rgb = yuv420sp_to_rgb(&view, ChromaOrder::Vu).unwrap();
        assert_eq!(rgb.dimensions(), (4, 6));
    }

    #[test]
    fn test_orientation_is_transpose_then_flip() {
        // Bright marker in the input's top-left corner.
        let data = neutral_frame(6, 4, |x, y| if x == 0 && y == 0 { 235 } else { 16 });
        let view = ImageView {
            data: &data,
            width: 6,
            height: 4,
        };
        let rgb = yuv420sp_to_rgb(&view, ChromaOrder::Vu).unwrap();

        // Input (0, 0) lands on output (height - 1, 0).
        assert_eq!(rgb.get_pixel(3, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);

        // And in general output (x, y) mirrors input (y, H - 1 - x).
        let data = neutral_frame(6, 4, |x, y| (16 + x * 10 + y * 60) as u8);
        let view = ImageView {
            data: &data,
            width: 6,
            height: 4,
        };
        let rgb = yuv420sp_to_rgb(&view, ChromaOrder::Vu).unwrap();
        for oy in 0..6u32 {
            for ox in 0..4u32 {
                let (ix, iy) = (oy as usize, 3 - ox as usize);
                let expected = yuv_to_rgb(data[iy * 6 + ix], 128, 128);
                assert_eq!(rgb.get_pixel(ox, oy).0, expected);
            }
        }
    }

    #[test]
    fn test_chroma_order() {
        let mut data = vec![81u8; 4 * 2 * 3 / 2];
        // One chroma pair for the left 2x2 block, another for the right one.
        data[8] = 240;
        data[9] = 90;
        data[10] = 240;
        data[11] = 90;
        let view = ImageView {
            data: &data,
            width: 4,
            height: 2,
        };

        let nv21 = yuv420sp_to_rgb(&view, ChromaOrder::Vu).unwrap();
        assert_eq!(nv21.get_pixel(0, 0).0, [254, 0, 0]);

        let nv12 = yuv420sp_to_rgb(&view, ChromaOrder::Uv).unwrap();
        assert_ne!(nv12.get_pixel(0, 0).0, [254, 0, 0]);
    }

    #[test]
    fn test_wrong_buffer_length_is_rejected() {
        let data = vec![0u8; 10];
        let view = ImageView {
            data: &data,
            width: 4,
            height: 4,
        };
        assert_eq!(
            yuv420sp_to_rgb(&view, ChromaOrder::Vu),
            Err(RectDetectError::InvalidFrameData {
                expected: 24,
                actual: 10
            })
        );
    }

    #[test]
    fn test_odd_or_empty_dimensions_are_rejected() {
        let data = vec![0u8; 0];
        let view = ImageView {
            data: &data,
            width: 0,
            height: 4,
        };
        assert!(matches!(
            yuv420sp_to_rgb(&view, ChromaOrder::Vu),
            Err(RectDetectError::InvalidDimensions { .. })
        ));

        let data = vec![0u8; 3 * 4 * 3 / 2];
        let view = ImageView {
            data: &data,
            width: 3,
            height: 4,
        };
        assert!(matches!(
            yuv420sp_to_rgb(&view, ChromaOrder::Vu),
            Err(RectDetectError::InvalidDimensions { .. })
        ));
    }
}
