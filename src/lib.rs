// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, AppState};
pub use config::{ServerConfig, ServiceConfig};
pub use vision::ocr::{
    DigitRecognizer, OcrError, Region, RegionOutcome, RegionPipeline, RegionPolicy,
    TesseractDigitRecognizer,
};
pub use vision::{OcrEngineConfig, OcrEngineManager};
