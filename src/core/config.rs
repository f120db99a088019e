// src/core/config.rs

use crate::cv::color::ChromaOrder;
use crate::cv::resize::ResizeFilter;
use serde::{Deserialize, Serialize};

/// Acceptance thresholds for quadrilateral candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Minimum `|area|` of a contour, as a fraction of the working frame area.
    pub min_area_ratio: f64,
    /// Polygon approximation tolerance, as a fraction of the contour perimeter.
    pub epsilon_ratio: f64,
    /// Smallest corner cosine accepted (about 107 degrees).
    pub min_cos: f64,
    /// Largest corner cosine accepted (60 degrees).
    pub max_cos: f64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        DetectorOptions {
            min_area_ratio: 0.01,
            epsilon_ratio: 0.1,
            min_cos: -0.3,
            max_cos: 0.5,
        }
    }
}

impl DetectorOptions {
    pub fn with_min_area_ratio(mut self, ratio: f64) -> Self {
        self.min_area_ratio = ratio;
        self
    }

    pub fn with_epsilon_ratio(mut self, ratio: f64) -> Self {
        self.epsilon_ratio = ratio;
        self
    }

    pub fn with_cos_band(mut self, min_cos: f64, max_cos: f64) -> Self {
        self.min_cos = min_cos;
        self.max_cos = max_cos;
        self
    }
}

/// Per-frame pipeline settings.
///
/// ```
/// use rectdetect_rs::PipelineConfig;
///
/// let config = PipelineConfig::default().with_preview_height(800);
/// assert_eq!(config.working_size, (400, 400));
/// assert_eq!(config.preview_height, Some(800));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bounding box `(width, height)` the decoded frame is fitted into.
    pub working_size: (u32, u32),
    /// Height of the surface the path is drawn on. `None` keeps working
    /// coordinates.
    pub preview_height: Option<u32>,
    pub filter: ResizeFilter,
    pub chroma_order: ChromaOrder,
    /// Draw contours and corners onto the returned working frame.
    pub annotate: bool,
    pub detector: DetectorOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            working_size: (400, 400),
            preview_height: None,
            filter: ResizeFilter::default(),
            chroma_order: ChromaOrder::default(),
            annotate: false,
            detector: DetectorOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_working_size(mut self, width: u32, height: u32) -> Self {
        self.working_size = (width, height);
        self
    }

    pub fn with_preview_height(mut self, height: u32) -> Self {
        self.preview_height = Some(height);
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_chroma_order(mut self, order: ChromaOrder) -> Self {
        self.chroma_order = order;
        self
    }

    pub fn with_annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn with_detector(mut self, detector: DetectorOptions) -> Self {
        self.detector = detector;
        self
    }

    /// Factor mapping working coordinates onto the preview surface.
    pub fn display_ratio(&self, working_height: u32) -> f32 {
        match self.preview_height {
            Some(preview) if working_height > 0 => preview as f32 / working_height as f32,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.working_size, (400, 400));
        assert_eq!(config.filter, ResizeFilter::Linear);
        assert_eq!(config.chroma_order, ChromaOrder::Vu);
        assert!(!config.annotate);
        assert_eq!(config.detector.min_area_ratio, 0.01);
        assert_eq!(config.detector.epsilon_ratio, 0.1);
        assert_eq!(config.detector.min_cos, -0.3);
        assert_eq!(config.detector.max_cos, 0.5);
    }

    #[test]
    fn test_display_ratio() {
        let config = PipelineConfig::default();
        assert_eq!(config.display_ratio(400), 1.0);

        let config = config.with_preview_height(800);
        assert_eq!(config.display_ratio(400), 2.0);
        assert_eq!(config.display_ratio(0), 1.0);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "preview_height": 1280, "chroma_order": "uv" }"#).unwrap();
        assert_eq!(config.preview_height, Some(1280));
        assert_eq!(config.chroma_order, ChromaOrder::Uv);
        assert_eq!(config.working_size, (400, 400));
        assert_eq!(config.detector, DetectorOptions::default());

        let options: DetectorOptions = serde_json::from_str(r#"{ "max_cos": 0.3 }"#).unwrap();
        assert_eq!(options.max_cos, 0.3);
        assert_eq!(options.min_cos, -0.3);
    }
}
