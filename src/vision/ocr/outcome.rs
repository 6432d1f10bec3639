// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-region reading and its wire representation

use std::fmt;

use super::region::RegionError;

/// Returned when a region was read but held no digits
pub const NO_DETECTION: &str = "No detection";

/// Prefix of the per-region failure marker
pub const ERROR_MARKER_PREFIX: &str = "Error: ";

/// Result of processing one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    /// Non-empty run of ASCII digits
    Digits(String),
    /// The engine ran but produced no digits
    NoDetection,
    /// The region could not be processed
    Failed(RegionError),
}

impl RegionOutcome {
    /// Keep only ASCII digits from raw engine output, then trim.
    pub fn from_raw_text(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        let digits = digits.trim();
        if digits.is_empty() {
            Self::NoDetection
        } else {
            Self::Digits(digits.to_string())
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The string placed in the `results` array
    pub fn to_result_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RegionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digits(digits) => f.write_str(digits),
            Self::NoDetection => f.write_str(NO_DETECTION),
            Self::Failed(err) => write!(f, "{}{}", ERROR_MARKER_PREFIX, err),
        }
    }
}
