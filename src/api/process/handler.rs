// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region-OCR endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, warn};

use super::request::ProcessRequest;
use super::response::ProcessResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::ocr::RegionPipeline;

/// POST /process - Read the digits in each region of an uploaded image
///
/// # Request (multipart/form-data)
/// - `image`: the image file (PNG, JPEG, WebP, GIF, BMP, TIFF)
/// - `crop_areas`: JSON array of `{x1, y1, x2, y2}` objects
///
/// # Response
/// - `status`: "success"
/// - `results`: one string per region, in order: the digits, `"No detection"`,
///   or an `"Error: ..."` marker for a region that could not be processed
///
/// # Errors
/// - 400 Bad Request: malformed body, missing field, bad `crop_areas`, bad image
/// - 503 Service Unavailable: OCR engine not loaded
/// - 500 Internal Server Error: processing task failed
pub async fn process_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = run(state, multipart).await;
    if let Err(e) = &result {
        warn!("Process request failed: {}", e);
    }
    result
}

async fn run(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    // 1. Read and validate form fields
    let request = ProcessRequest::from_multipart(multipart).await?;
    debug!(
        "Process request: {} bytes of image, {} region(s)",
        request.image.len(),
        request.regions.len()
    );

    // 2. Get the shared recognizer
    let recognizer = state.engine_manager.get_recognizer().ok_or_else(|| {
        ApiError::ServiceUnavailable("OCR engine not loaded".to_string())
    })?;

    let pipeline = RegionPipeline::new(recognizer)
        .with_policy(state.engine_manager.config().region_policy)
        .with_max_image_bytes(state.max_upload_bytes);

    // 3. Run the blocking pipeline off the async workers
    let ProcessRequest { image, regions } = request;
    let outcomes = tokio::task::spawn_blocking(move || pipeline.process(&image, &regions))
        .await
        .map_err(|e| ApiError::InternalError(format!("processing task failed: {}", e)))??;

    let response = ProcessResponse::from_outcomes(&outcomes);
    debug!("Process complete: {:?}", response.results);

    Ok(Json(response))
}
