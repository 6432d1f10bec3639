// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the region OCR service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "json-crop-areas",
    "otsu-binarization",
    "digit-whitelist",
    "per-region-errors",
    "static-frontend",
];

/// Get version information as a formatted string
pub fn get_version_string() -> String {
    format!("region-ocr {} ({})", VERSION, FEATURES.join(", "))
}
