// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region-OCR pipeline: decode once, then crop, binarize and read each region

use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::engine::DigitRecognizer;
use super::outcome::RegionOutcome;
use super::preprocessing::preprocess_region;
use super::region::{Region, RegionError, RegionPolicy};
use crate::vision::image_utils::{decode_rgb_image, ImageError, MAX_IMAGE_SIZE};

/// Failures that abort the whole request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),
}

/// Synchronous region-OCR pipeline.
///
/// Holds only shared read-only state; a single instance may serve any number
/// of requests, each with its own image and regions.
#[derive(Clone)]
pub struct RegionPipeline {
    recognizer: Arc<dyn DigitRecognizer>,
    policy: RegionPolicy,
    max_image_bytes: usize,
}

impl std::fmt::Debug for RegionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionPipeline")
            .field("recognizer", &self.recognizer.name())
            .field("policy", &self.policy)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish()
    }
}

impl RegionPipeline {
    pub fn new(recognizer: Arc<dyn DigitRecognizer>) -> Self {
        Self {
            recognizer,
            policy: RegionPolicy::default(),
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: RegionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    /// Decode `image_bytes` and read every region, in order.
    ///
    /// Only an undecodable image fails the call. Any per-region problem is
    /// reported as [`RegionOutcome::Failed`] at that region's position.
    pub fn process(
        &self,
        image_bytes: &[u8],
        regions: &[Region],
    ) -> Result<Vec<RegionOutcome>, PipelineError> {
        let started = Instant::now();
        let (image, info) = decode_rgb_image(image_bytes, self.max_image_bytes)?;
        debug!(
            "Decoded {:?} image: {}x{}, {} bytes",
            info.format, info.width, info.height, info.size_bytes
        );

        let outcomes = self.process_image(&image, regions);

        info!(
            "Processed {} region(s) on {}x{} image in {}ms ({} failed)",
            outcomes.len(),
            info.width,
            info.height,
            started.elapsed().as_millis(),
            outcomes.iter().filter(|o| o.is_failed()).count()
        );
        Ok(outcomes)
    }

    /// Read every region of an already decoded raster.
    pub fn process_image(&self, image: &RgbImage, regions: &[Region]) -> Vec<RegionOutcome> {
        regions
            .iter()
            .enumerate()
            .map(|(index, region)| self.process_region(image, index, region))
            .collect()
    }

    fn process_region(&self, image: &RgbImage, index: usize, region: &Region) -> RegionOutcome {
        let rect = match region.resolve(image.width(), image.height(), self.policy) {
            Ok(rect) => rect,
            Err(e) => {
                warn!("Region {} rejected: {}", index, e);
                return RegionOutcome::Failed(e);
            }
        };

        let binary = preprocess_region(image, &rect);

        match self.recognizer.recognize_digits(&binary) {
            Ok(raw) => {
                let outcome = RegionOutcome::from_raw_text(&raw);
                debug!("Region {} ({:?}): {}", index, rect, outcome);
                outcome
            }
            Err(e) => {
                warn!("Region {} recognition failed: {}", index, e);
                RegionOutcome::Failed(RegionError::Recognition(e.to_string()))
            }
        }
    }
}
