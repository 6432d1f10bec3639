// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /process response types

use serde::{Deserialize, Serialize};

use crate::vision::ocr::RegionOutcome;

/// Successful response: `{"status": "success", "results": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessResponse {
    pub status: String,
    /// One string per region, in request order
    pub results: Vec<String>,
}

impl ProcessResponse {
    pub fn new(results: Vec<String>) -> Self {
        Self {
            status: "success".to_string(),
            results,
        }
    }

    pub fn from_outcomes(outcomes: &[RegionOutcome]) -> Self {
        Self::new(outcomes.iter().map(RegionOutcome::to_result_string).collect())
    }
}
