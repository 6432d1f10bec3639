// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing and `crop_areas` validation for POST /process

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::vision::ocr::Region;

/// Form field holding the image file
pub const IMAGE_FIELD: &str = "image";

/// Form field holding the JSON list of regions
pub const CROP_AREAS_FIELD: &str = "crop_areas";

/// Fields read from a /process upload
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Raw image file bytes
    pub image: Bytes,
    /// Regions in request order
    pub regions: Vec<Region>,
}

impl ProcessRequest {
    /// Read the `image` and `crop_areas` fields from a multipart body.
    ///
    /// The first occurrence of each field wins; unknown fields are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut image: Option<Bytes> = None;
        let mut crop_areas: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("malformed multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                IMAGE_FIELD if image.is_none() => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("failed to read image field", e))?;
                    image = Some(data);
                }
                CROP_AREAS_FIELD if crop_areas.is_none() => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| multipart_error("failed to read crop_areas field", e))?;
                    crop_areas = Some(text);
                }
                _ => debug!("Skipping form field '{}'", name),
            }
        }

        let image = image.ok_or_else(|| missing_field(IMAGE_FIELD))?;
        let crop_areas = crop_areas.ok_or_else(|| missing_field(CROP_AREAS_FIELD))?;
        let regions = parse_crop_areas(&crop_areas)?;

        Ok(Self { image, regions })
    }
}

/// A body cut off by the request limit is 413; anything else is a bad request.
fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("{}: {}", context, e))
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, e))
    }
}

fn missing_field(field: &str) -> ApiError {
    ApiError::ValidationError {
        field: field.to_string(),
        message: format!("missing form field '{}'", field),
    }
}

/// Parse `crop_areas` as a JSON array of `{x1, y1, x2, y2}` objects.
pub fn parse_crop_areas(raw: &str) -> Result<Vec<Region>, ApiError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(|e| {
        invalid_crop_areas(format!(
            "expected a JSON array of {{x1, y1, x2, y2}} objects: {}",
            e
        ))
    })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            // Structs also deserialize from sequences; only objects are accepted
            if !entry.is_object() {
                return Err(invalid_crop_areas(format!(
                    "entry {} must be an object with keys x1, y1, x2, y2",
                    index
                )));
            }
            serde_json::from_value::<Region>(entry)
                .map_err(|e| invalid_crop_areas(format!("entry {}: {}", index, e)))
        })
        .collect()
}

fn invalid_crop_areas(message: String) -> ApiError {
    ApiError::ValidationError {
        field: CROP_AREAS_FIELD.to_string(),
        message,
    }
}
