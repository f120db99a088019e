// Copyright (c) 2026 rectdetect-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
// src/simd/mod.rs

/*
 * SIMD dispatcher for the per-pixel stages. The implementation (WASM SIMD,
 * native SSE2 or scalar) is chosen at compile time from the target
 * architecture and the "simd" feature flag; `backend()` performs the
 * one-time, process-wide runtime check before the first frame.
 */

use crate::{RectDetectError, Result};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{error, info};

#[cfg(all(target_arch = "wasm32", feature = "simd"))]
pub mod wasm;

#[cfg(all(not(target_arch = "wasm32"), feature = "simd"))]
pub mod native;

/// The `ComputerVision` implementation used by default pipelines.
#[cfg(all(target_arch = "wasm32", feature = "simd"))]
pub type DefaultCV = wasm::WasmCV;

#[cfg(all(not(target_arch = "wasm32"), feature = "simd"))]
pub type DefaultCV = native::NativeCV;

#[cfg(not(feature = "simd"))]
pub type DefaultCV = crate::cv::scalar::ScalarCV;

/// Instruction set backing the default pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Backend {
    Scalar,
    Sse2,
    WasmSimd128,
}

static BACKEND: OnceLock<std::result::Result<Backend, String>> = OnceLock::new();

/// Selects and validates the image-processing backend.
///
/// The check runs once per process; later calls return the cached outcome,
/// so it is safe to call from every pipeline constructor.
pub fn backend() -> Result<Backend> {
    BACKEND
        .get_or_init(|| {
            let selected = detect();
            match &selected {
                Ok(backend) => info!(?backend, "image backend selected"),
                Err(reason) => error!(%reason, "image backend unavailable"),
            }
            selected
        })
        .clone()
        .map_err(RectDetectError::BackendInit)
}

#[cfg(all(target_arch = "x86_64", feature = "simd"))]
fn detect() -> std::result::Result<Backend, String> {
    if std::is_x86_feature_detected!("sse2") {
        Ok(Backend::Sse2)
    } else {
        Err("the simd build requires SSE2".to_string())
    }
}

#[cfg(all(target_arch = "wasm32", feature = "simd"))]
fn detect() -> std::result::Result<Backend, String> {
    if cfg!(target_feature = "simd128") {
        Ok(Backend::WasmSimd128)
    } else {
        Ok(Backend::Scalar)
    }
}

#[cfg(not(all(any(target_arch = "x86_64", target_arch = "wasm32"), feature = "simd")))]
fn detect() -> std::result::Result<Backend, String> {
    Ok(Backend::Scalar)
}
