// src/cv/resize.rs

use crate::{RectDetectError, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Resampling filter used by the downscaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
    Cubic,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Linear => FilterType::Triangle,
            ResizeFilter::Cubic => FilterType::CatmullRom,
        }
    }
}

/// A resized frame together with the factor that maps it back to its source.
#[derive(Debug, Clone)]
pub struct Scaled {
    pub image: RgbImage,
    /// `source = working * ratio`
    pub ratio: f32,
}

/// Output size for fitting `width x height` into `target_w x target_h`.
///
/// Returns the size and the ratio applied (the larger of the two per-axis
/// ratios, so neither side exceeds its target).
pub fn fit_size(width: u32, height: u32, target_w: u32, target_h: u32) -> Result<((u32, u32), f64)> {
    if target_w == 0 || target_h == 0 {
        return Err(RectDetectError::InvalidTarget {
            width: target_w,
            height: target_h,
        });
    }

    let ratio_w = width as f64 / target_w as f64;
    let ratio_h = height as f64 / target_h as f64;
    let ratio = ratio_w.max(ratio_h);
    if ratio <= 0.0 {
        return Err(RectDetectError::InvalidDimensions { width, height });
    }

    // Epsilon keeps exact fits (e.g. 480 / 1.2) from flooring one pixel short.
    let side = |len: u32, target: u32| ((len as f64 / ratio + 1e-9).floor() as u32).clamp(1, target);
    Ok(((side(width, target_w), side(height, target_h)), ratio))
}

/// Rescales `img` to fit within the target while preserving aspect ratio.
pub fn fit_within(img: &RgbImage, target_w: u32, target_h: u32, filter: ResizeFilter) -> Result<Scaled> {
    let ((width, height), ratio) = fit_size(img.width(), img.height(), target_w, target_h)?;
    let image = if (width, height) == img.dimensions() {
        img.clone()
    } else {
        imageops::resize(img, width, height, filter.into())
    };

    Ok(Scaled {
        image,
        ratio: ratio as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size_landscape_and_portrait() {
        let ((w, h), ratio) = fit_size(480, 640, 400, 400).unwrap();
        assert_eq!((w, h), (300, 400));
        assert!((ratio - 1.6).abs() < 1e-9);

        let ((w, h), _) = fit_size(1280, 720, 400, 400).unwrap();
        assert_eq!((w, h), (400, 225));
    }

    #[test]
    fn test_fit_size_never_exceeds_target_and_keeps_aspect() {
        for &(width, height) in &[(480u32, 640u32), (720, 1280), (333, 777), (1000, 999), (17, 3)] {
            for &(tw, th) in &[(400u32, 400u32), (320, 240), (100, 300)] {
                let ((w, h), ratio) = fit_size(width, height, tw, th).unwrap();
                assert!(w <= tw && h <= th, "{width}x{height} -> {w}x{h} in {tw}x{th}");
                assert!((w as f64 - width as f64 / ratio).abs() <= 1.0);
                assert!((h as f64 - height as f64 / ratio).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_small_frames_are_scaled_up_to_fit() {
        let ((w, h), ratio) = fit_size(100, 50, 400, 400).unwrap();
        assert_eq!((w, h), (400, 200));
        assert!((ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_target_is_rejected() {
        assert_eq!(
            fit_size(10, 10, 0, 400),
            Err(RectDetectError::InvalidTarget {
                width: 0,
                height: 400
            })
        );
    }

    #[test]
    fn test_fit_within_resizes_image() {
        let img = RgbImage::from_pixel(80, 60, image::Rgb([10, 20, 30]));
        let scaled = fit_within(&img, 40, 40, ResizeFilter::Linear).unwrap();
        assert_eq!(scaled.image.dimensions(), (40, 30));
        assert!((scaled.ratio - 2.0).abs() < 1e-6);
        assert_eq!(scaled.image.get_pixel(5, 5).0, [10, 20, 30]);
    }
}
