// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client-specified crop regions and their validation against image bounds

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// How a region that reaches past the image edge is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolicy {
    /// Any coordinate outside the image fails the region
    #[default]
    Strict,
    /// Coordinates are clamped to the image; only an empty result fails
    Clamp,
}

/// Why a single region could not produce a reading
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("empty region: requires x1 < x2 and y1 < y2 (got x1={x1}, y1={y1}, x2={x2}, y2={y2})")]
    Empty { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("region x1={x1}, y1={y1}, x2={x2}, y2={y2} lies outside the {width}x{height} image")]
    OutOfBounds {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        width: u32,
        height: u32,
    },

    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// A rectangle in image pixel coordinates.
///
/// `x` indexes columns and `y` indexes rows; the crop covers rows `y1..y2`
/// and columns `x1..x2` (end-exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Region {
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub x1: i64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub y1: i64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub x2: i64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub y2: i64,
}

/// A validated, non-empty crop inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Region covering a whole `width` x `height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i64, height as i64)
    }

    /// Resolve this region against an image of the given size.
    pub fn resolve(
        &self,
        width: u32,
        height: u32,
        policy: RegionPolicy,
    ) -> Result<CropRect, RegionError> {
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(self.empty());
        }

        let (w, h) = (width as i64, height as i64);
        let (x1, y1, x2, y2) = match policy {
            RegionPolicy::Strict => {
                let inside = |v: i64, max: i64| (0..=max).contains(&v);
                if !(inside(self.x1, w) && inside(self.x2, w) && inside(self.y1, h) && inside(self.y2, h)) {
                    return Err(RegionError::OutOfBounds {
                        x1: self.x1,
                        y1: self.y1,
                        x2: self.x2,
                        y2: self.y2,
                        width,
                        height,
                    });
                }
                (self.x1, self.y1, self.x2, self.y2)
            }
            RegionPolicy::Clamp => (
                self.x1.clamp(0, w),
                self.y1.clamp(0, h),
                self.x2.clamp(0, w),
                self.y2.clamp(0, h),
            ),
        };

        if x1 >= x2 || y1 >= y2 {
            return Err(self.empty());
        }

        Ok(CropRect {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }

    fn empty(&self) -> RegionError {
        RegionError::Empty {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts integers, floats (truncated toward zero) and integer strings.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCoordinate::deserialize(deserializer)
        .map_err(|_| de::Error::custom("coordinate must be a number or an integer string"))?
    {
        RawCoordinate::Int(v) => Ok(v),
        RawCoordinate::Float(v) => {
            let truncated = v.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                return Err(de::Error::custom(format!("coordinate {} is out of range", v)));
            }
            Ok(truncated as i64)
        }
        RawCoordinate::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("coordinate '{}' is not an integer", s))),
    }
}
