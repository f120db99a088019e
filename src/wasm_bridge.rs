#![cfg(target_arch = "wasm32")]
#![cfg(feature = "wasm")]

use crate::core::config::PipelineConfig;
use crate::core::corners::PathResult;
use crate::core::pipeline::FramePipeline;
use crate::ImageView;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
pub struct WasmPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Serialize)]
pub struct WasmPath {
    pub points: Vec<WasmPoint>,
    pub closed: bool,
}

impl From<&PathResult> for WasmPath {
    fn from(path: &PathResult) -> Self {
        WasmPath {
            points: path.points.iter().map(|p| WasmPoint { x: p.x, y: p.y }).collect(),
            closed: path.closed(),
        }
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS-facing quadrilateral detector.
#[wasm_bindgen]
pub struct RectDetector {
    pipeline: FramePipeline,
}

#[wasm_bindgen]
impl RectDetector {
    /// `config` is an optional plain object mirroring `PipelineConfig`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<RectDetector, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };

        let pipeline = FramePipeline::new(config).map_err(js_error)?;
        Ok(RectDetector { pipeline })
    }

    /// Detects the quadrilateral in one NV21/NV12 frame.
    /// Resolves to `{ points, closed }` or `null` when nothing was found.
    pub fn detect_frame(&self, width: u32, height: u32, frame_data: &[u8]) -> Result<JsValue, JsValue> {
        let frame = ImageView {
            data: frame_data,
            width,
            height,
        };

        match self.pipeline.detect(&frame).map_err(js_error)? {
            Some(path) => serde_wasm_bindgen::to_value(&WasmPath::from(&path)).map_err(js_error),
            None => Ok(JsValue::NULL),
        }
    }
}
