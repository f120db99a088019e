// Copyright (c) 2026 rectdetect-rs contributors
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT
// src/core/mod.rs
pub mod config;
pub mod corners;
pub mod detector;
pub mod pipeline;
pub mod worker;
