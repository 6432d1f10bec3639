// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Digit recognition engines
//!
//! The pipeline only talks to [`DigitRecognizer`]; the Tesseract backend is
//! one implementation of it.

use std::collections::HashMap;

use image::{GrayImage, ImageFormat};
use rusty_tesseract::{Args, Image};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Characters the engine is allowed to emit
pub const DIGIT_WHITELIST: &str = "0123456789";

/// Page segmentation mode 6: assume a single uniform block of text
pub const DEFAULT_PSM: i32 = 6;

/// Default Tesseract language pack
pub const DEFAULT_LANG: &str = "eng";

/// Errors raised by an OCR engine
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR recognition failed: {0}")]
    Recognition(String),

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads the digits in a binarized crop.
///
/// Implementations are shared across requests behind an `Arc` and must not
/// keep mutable state after construction.
pub trait DigitRecognizer: Send + Sync {
    /// Engine name reported by the health endpoint
    fn name(&self) -> &str;

    /// Engine version, if known
    fn version(&self) -> Option<String> {
        None
    }

    /// Raw engine output for `image`. Callers still filter non-digits.
    fn recognize_digits(&self, image: &GrayImage) -> Result<String, OcrError>;
}

/// Tesseract config variable restricting output characters
pub const WHITELIST_VARIABLE: &str = "tessedit_char_whitelist";

/// Tesseract arguments for digit-only recognition
pub fn digit_args(lang: &str, psm: i32) -> Args {
    Args {
        lang: lang.to_string(),
        config_variables: HashMap::from([(
            WHITELIST_VARIABLE.to_string(),
            DIGIT_WHITELIST.to_string(),
        )]),
        psm: Some(psm),
        ..Args::default()
    }
}

/// Tesseract-backed recognizer restricted to digits
#[derive(Debug, Clone)]
pub struct TesseractDigitRecognizer {
    args: Args,
    version: String,
}

impl TesseractDigitRecognizer {
    /// Probe the `tesseract` binary and build a digit-only recognizer.
    ///
    /// # Errors
    /// Returns `OcrError::EngineUnavailable` if the binary cannot be run.
    pub fn new(lang: &str, psm: i32) -> Result<Self, OcrError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| OcrError::EngineUnavailable(e.to_string()))?;

        match rusty_tesseract::get_tesseract_langs() {
            Ok(langs) if !langs.iter().any(|l| l == lang) => {
                warn!(
                    "Tesseract language '{}' not installed (available: {:?})",
                    lang, langs
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Could not list Tesseract languages: {}", e),
        }

        let args = digit_args(lang, psm);

        info!(
            "Tesseract {} ready (lang={}, psm={})",
            version.trim(),
            lang,
            psm
        );

        Ok(Self {
            args,
            version: version.trim().to_string(),
        })
    }
}

impl DigitRecognizer for TesseractDigitRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn version(&self) -> Option<String> {
        Some(self.version.clone())
    }

    fn recognize_digits(&self, image: &GrayImage) -> Result<String, OcrError> {
        // The tesseract binary reads from disk; the file is removed on drop.
        let mut file = tempfile::Builder::new()
            .prefix("region-ocr-")
            .suffix(".png")
            .tempfile()?;
        image
            .write_to(file.as_file_mut(), ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("failed to encode crop: {}", e)))?;

        let input = Image::from_path(file.path())
            .map_err(|e| OcrError::Recognition(e.to_string()))?;
        let text = rusty_tesseract::image_to_string(&input, &self.args)
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        debug!("Tesseract raw output: {:?}", text);
        Ok(text)
    }
}
