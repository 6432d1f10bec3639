// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for region digit recognition
//!
//! This module provides:
//! - Image decoding for uploaded files
//! - The region-OCR pipeline and its engine seam
//! - A process-wide OCR engine manager
//!
//! All processing is CPU-only and synchronous.

pub mod engine_manager;
pub mod image_utils;
pub mod ocr;

pub use engine_manager::{EngineInfo, OcrEngineConfig, OcrEngineManager};
pub use image_utils::{decode_image_bytes, decode_rgb_image, detect_format, ImageError, ImageInfo};
