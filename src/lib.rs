// Copyright (c) 2026 rectdetect-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
use nalgebra::Vector2;

/// 2D Point with floating point precision (f32 for SIMD/WASM compatibility)
pub type Point2f = Vector2<f32>;

/// 2D Point in pixel coordinates
pub type Point2i = Vector2<i32>;

/// The four corners of a detected quadrilateral
pub type QuadCorners = [Point2f; 4];

/// Zero-copy view over a packed 8-bit pixel buffer.
/// Designed to map WASM memory or native video buffers without copying.
///
/// # Fields
/// * `data` - A slice representing a 1D contiguous array of 8-bit samples.
/// * `width` - The logical width of the frame in pixels.
/// * `height` - The logical height of the frame in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> ImageView<'a> {
    /// Borrow the raw samples of an `image` crate buffer.
    pub fn from_gray(img: &'a image::GrayImage) -> Self {
        ImageView {
            data: img.as_raw(),
            width: img.width(),
            height: img.height(),
        }
    }

    /// Borrow the raw (interleaved RGB) samples of an `image` crate buffer.
    pub fn from_rgb(img: &'a image::RgbImage) -> Self {
        ImageView {
            data: img.as_raw(),
            width: img.width(),
            height: img.height(),
        }
    }

    /// Number of pixels covered by the view.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Errors raised while turning a raw frame into a detection.
///
/// "No quadrilateral found" is deliberately absent: it is a normal outcome
/// and surfaces as `None` / [`core::worker::Detection::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RectDetectError {
    /// The sensor buffer does not match `width * height * 3 / 2`.
    #[error("invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrameData { expected: usize, actual: usize },
    /// Zero or odd frame sides (4:2:0 chroma needs even dimensions).
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// Working resolution with a zero side.
    #[error("invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
    /// A pipeline stage failed unexpectedly; only the current frame is lost.
    #[error("stage `{stage}` failed: {reason}")]
    StageFailure { stage: &'static str, reason: String },
    /// The image-processing backend could not be initialized.
    #[error("backend initialization failed: {0}")]
    BackendInit(String),
    /// The detection worker has been shut down.
    #[error("detection worker stopped")]
    WorkerStopped,
}

pub type Result<T> = std::result::Result<T, RectDetectError>;

pub mod annotate;
pub mod core;
pub mod cv;
pub mod simd;

#[cfg(feature = "wasm")]
pub mod wasm_bridge;

pub use crate::core::config::{DetectorOptions, PipelineConfig};
pub use crate::core::corners::{order_corners, PathResult};
pub use crate::core::detector::{QuadCandidate, QuadDetector};
pub use crate::core::pipeline::{FrameAnalysis, FramePipeline, YuvFrame};
pub use crate::core::worker::{Detection, DetectionWorker, FrameOutcome, Submission};
pub use crate::cv::color::ChromaOrder;
pub use crate::cv::resize::ResizeFilter;
