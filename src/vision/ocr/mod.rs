// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Digit OCR over client-specified image regions
//!
//! Components:
//! - `region` - Region parsing and bounds validation
//! - `preprocessing` - Crop, grayscale and inverted Otsu binarization
//! - `engine` - `DigitRecognizer` seam and the Tesseract backend
//! - `outcome` - Per-region result and its wire string
//! - `pipeline` - Sequential per-region processing

pub mod engine;
pub mod outcome;
pub mod pipeline;
pub mod preprocessing;
pub mod region;

pub use engine::{DigitRecognizer, OcrError, TesseractDigitRecognizer};
pub use outcome::{RegionOutcome, ERROR_MARKER_PREFIX, NO_DETECTION};
pub use pipeline::{PipelineError, RegionPipeline};
pub use region::{CropRect, Region, RegionError, RegionPolicy};
