// src/cv/mod.rs

use crate::ImageView;
use image::GrayImage;

/// Fixed binarization level applied to the edge map.
pub const BINARY_THRESHOLD: u8 = 127;

/// Common trait for the per-pixel computer vision stages.
/// Implemented by the scalar path and, behind the `simd` feature, by the
/// native and wasm SIMD paths so all of them stay interchangeable.
pub trait ComputerVision {
    /// Converts an interleaved RGB image buffer to grayscale.
    ///
    /// # Arguments
    /// * `src` - The source `ImageView` containing RGB pixels (3 bytes each).
    /// * `dst` - The destination buffer where grayscale pixels will be written. Must be pre-allocated.
    fn grayscale(src: &ImageView, dst: &mut [u8]);

    /// Builds an edge-intensity map from a grayscale image.
    ///
    /// Horizontal and vertical 3x3 Sobel derivatives are computed at 16-bit
    /// precision, their absolute values saturated to 8 bits and blended
    /// with equal 0.5 weights.
    ///
    /// # Arguments
    /// * `src` - The source grayscale `ImageView`.
    /// * `dst` - The destination buffer, same size as `src`.
    fn sobel_edges(src: &ImageView, dst: &mut [u8]);

    /// Applies a binary threshold: `v >= threshold` becomes 255, anything else 0.
    ///
    /// # Arguments
    /// * `src` - The source slice of single channel pixels.
    /// * `dst` - The destination slice where binary pixels will be written.
    /// * `threshold` - The inclusive cut-off level (0-255).
    fn threshold(src: &[u8], dst: &mut [u8], threshold: u8);
}

/// Grayscale + Sobel magnitude for an RGB frame.
pub fn edge_map<CV: ComputerVision>(rgb: &image::RgbImage) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let mut gray = GrayImage::new(width, height);
    CV::grayscale(&ImageView::from_rgb(rgb), &mut gray);

    let mut edges = GrayImage::new(width, height);
    CV::sobel_edges(&ImageView::from_gray(&gray), &mut edges);
    edges
}

/// Thresholds an edge map at [`BINARY_THRESHOLD`] into a 0/255 mask.
pub fn binarize<CV: ComputerVision>(edges: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(edges.width(), edges.height());
    CV::threshold(edges.as_raw(), &mut mask, BINARY_THRESHOLD);
    mask
}

pub mod color;
pub mod contours;
pub mod geometry;
pub mod resize;
pub mod scalar;
