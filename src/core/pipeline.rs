// src/core/pipeline.rs

use crate::annotate;
use crate::core::config::PipelineConfig;
use crate::core::corners::{order_corners, scale_points, PathResult};
use crate::core::detector::{QuadCandidate, QuadDetector};
use crate::cv::color::yuv420sp_to_rgb;
use crate::cv::resize::fit_within;
use crate::cv::{binarize, edge_map, ComputerVision};
use crate::simd::{self, DefaultCV};
use crate::{ImageView, Point2i, RectDetectError, Result};
use image::{GrayImage, RgbImage};
use std::marker::PhantomData;
use tracing::{debug, debug_span};

/// An owned 4:2:0 semi-planar sensor frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YuvFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl YuvFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        YuvFrame { data, width, height }
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Everything the pipeline produced for one frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Orientation-corrected, downscaled frame (annotated when enabled).
    pub working: RgbImage,
    /// Binary edge mask the contours were traced on.
    pub mask: GrayImage,
    /// `input = working * resize_ratio`
    pub resize_ratio: f32,
    /// `display = working * display_ratio`
    pub display_ratio: f32,
    /// Winning quadrilateral in working coordinates.
    pub candidate: Option<QuadCandidate>,
    /// Ordered outline in display coordinates.
    pub path: Option<PathResult>,
}

/// Synchronous frame-to-path pipeline.
///
/// Stages run strictly in sequence: decode and rotate, fit into the
/// working size, edge map, binarize, contour scan, corner ordering. No
/// state is carried from one frame to the next.
pub struct FramePipeline<CV: ComputerVision = DefaultCV> {
    config: PipelineConfig,
    detector: QuadDetector,
    _cv: PhantomData<fn() -> CV>,
}

impl FramePipeline<DefaultCV> {
    /// Builds a pipeline on the compile-time selected backend.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_cv(config)
    }
}

impl<CV: ComputerVision> FramePipeline<CV> {
    /// Builds a pipeline on an explicit `ComputerVision` implementation.
    ///
    /// # Errors
    /// * [`RectDetectError::InvalidTarget`] for a working size with a zero side.
    /// * [`RectDetectError::BackendInit`] when the backend check fails.
    pub fn with_cv(config: PipelineConfig) -> Result<Self> {
        let (width, height) = config.working_size;
        if width == 0 || height == 0 {
            return Err(RectDetectError::InvalidTarget { width, height });
        }
        simd::backend()?;

        Ok(FramePipeline {
            detector: QuadDetector::new(config.detector),
            config,
            _cv: PhantomData,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage and keeps the intermediate products.
    pub fn analyze(&self, frame: &ImageView) -> Result<FrameAnalysis> {
        let _frame = debug_span!("frame", width = frame.width, height = frame.height).entered();

        let rgb = debug_span!("color").in_scope(|| yuv420sp_to_rgb(frame, self.config.chroma_order))?;

        let (target_w, target_h) = self.config.working_size;
        let scaled = debug_span!("resize").in_scope(|| fit_within(&rgb, target_w, target_h, self.config.filter))?;
        let (width, height) = scaled.image.dimensions();
        debug!(width, height, ratio = scaled.ratio, "working frame");

        let mask = debug_span!("edges").in_scope(|| binarize::<CV>(&edge_map::<CV>(&scaled.image)));

        let mut outlines: Vec<Vec<Point2i>> = Vec::new();
        let candidate = debug_span!("contours").in_scope(|| {
            if self.config.annotate {
                self.detector.find_quad_with(&mask, |contour| outlines.push(contour.to_vec()))
            } else {
                self.detector.find_quad(&mask)
            }
        });

        let display_ratio = self.config.display_ratio(height);
        let path = candidate
            .as_ref()
            .and_then(|quad| order_corners(&scale_points(&quad.corners, display_ratio)));
        debug!(found = path.is_some(), display_ratio, "frame analyzed");

        let mut working = scaled.image;
        if self.config.annotate {
            for contour in &outlines {
                annotate::draw_outline(&mut working, contour, annotate::CONTOUR_COLOR);
            }
            if let Some(quad) = &candidate {
                annotate::draw_corners(&mut working, &quad.corners, annotate::CORNER_COLOR);
            }
        }

        Ok(FrameAnalysis {
            working,
            mask,
            resize_ratio: scaled.ratio,
            display_ratio,
            candidate,
            path,
        })
    }

    /// Frame in, ordered outline out. `Ok(None)` when nothing qualifies.
    pub fn detect(&self, frame: &ImageView) -> Result<Option<PathResult>> {
        self.analyze(frame).map(|analysis| analysis.path)
    }
}
