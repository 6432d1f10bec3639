// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR engine manager: one process-wide, read-only digit recognizer

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::vision::ocr::engine::{DEFAULT_LANG, DEFAULT_PSM};
use crate::vision::ocr::{DigitRecognizer, RegionPolicy, TesseractDigitRecognizer};

/// Configuration for the OCR engine and region handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrEngineConfig {
    /// Tesseract language pack
    pub lang: String,
    /// Tesseract page segmentation mode
    pub psm: i32,
    /// Treatment of regions that reach past the image edge
    pub region_policy: RegionPolicy,
}

impl Default for OcrEngineConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            psm: DEFAULT_PSM,
            region_policy: RegionPolicy::Strict,
        }
    }
}

/// Information about the loaded engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine name
    pub name: String,
    /// Whether the engine is available
    pub available: bool,
    /// Engine version, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Manager for the OCR engine
///
/// The engine is loaded once at startup and shared by every request.
/// A missing engine is not fatal: the service starts and `/process`
/// reports it as unavailable.
pub struct OcrEngineManager {
    recognizer: Option<Arc<dyn DigitRecognizer>>,
    config: OcrEngineConfig,
}

impl OcrEngineManager {
    /// Create a manager backed by Tesseract
    pub fn new(config: OcrEngineConfig) -> Self {
        let recognizer: Option<Arc<dyn DigitRecognizer>> =
            match TesseractDigitRecognizer::new(&config.lang, config.psm) {
                Ok(engine) => {
                    tracing::info!("✅ Tesseract digit recognizer loaded");
                    Some(Arc::new(engine))
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to load OCR engine: {}", e);
                    None
                }
            };

        Self { recognizer, config }
    }

    /// Create a manager around an existing recognizer
    pub fn with_recognizer(recognizer: Arc<dyn DigitRecognizer>, config: OcrEngineConfig) -> Self {
        Self {
            recognizer: Some(recognizer),
            config,
        }
    }

    /// Create a manager with no engine at all
    pub fn unavailable(config: OcrEngineConfig) -> Self {
        Self {
            recognizer: None,
            config,
        }
    }

    /// Get the recognizer if available
    pub fn get_recognizer(&self) -> Option<Arc<dyn DigitRecognizer>> {
        self.recognizer.clone()
    }

    /// Check if an engine is available
    pub fn has_engine(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn config(&self) -> &OcrEngineConfig {
        &self.config
    }

    /// Describe the engine for health reporting
    pub fn engine_info(&self) -> EngineInfo {
        match &self.recognizer {
            Some(engine) => EngineInfo {
                name: engine.name().to_string(),
                available: true,
                version: engine.version(),
            },
            None => EngineInfo {
                name: "tesseract".to_string(),
                available: false,
                version: None,
            },
        }
    }
}
