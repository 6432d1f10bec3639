// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region-OCR API endpoint module
//!
//! Provides POST /process for reading digits from image regions.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::process_handler;
pub use request::{parse_crop_areas, ProcessRequest};
pub use response::ProcessResponse;
