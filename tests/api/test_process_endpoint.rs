// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /process endpoint tests
//!
//! These tests drive the full router with hand-built multipart bodies and
//! fake recognizers, so they run without a Tesseract install.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use region_ocr::api::{create_app, AppState};
use region_ocr::vision::ocr::RegionPolicy;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::common::{
    blank_page, encode, encode_png, ink, page_with_centered_ink, state_with, state_with_policy,
    state_without_engine, BrokenReader, InkReader, MultipartBuilder, SizeReader,
};

/// Helper: POST a multipart body to /process and return status and JSON body
async fn post_process(state: AppState, content_type: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/process")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();

    let response = create_app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Helper: image + crop_areas upload
async fn upload(state: AppState, image: &[u8], crop_areas: &str) -> (StatusCode, Value) {
    let (content_type, body) = MultipartBuilder::new()
        .file("image", "upload.png", image)
        .text("crop_areas", crop_areas)
        .build();
    post_process(state, &content_type, body).await
}

#[cfg(test)]
mod process_endpoint_tests {
    use super::*;

    // =============================================================================
    // Success paths
    // =============================================================================

    #[tokio::test]
    async fn test_full_bounds_region_reads_digit() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "results": ["7"]}));
    }

    #[tokio::test]
    async fn test_results_follow_region_order() {
        let state = state_with(Arc::new(SizeReader));
        let mut page = blank_page(120, 60);
        ink(&mut page, 5, 5, 10, 10);
        ink(&mut page, 90, 40, 10, 10);
        let image = encode_png(&page);

        let crop_areas = json!([
            {"x1": 80, "y1": 30, "x2": 120, "y2": 60},
            {"x1": 40, "y1": 0, "x2": 70, "y2": 20},
            {"x1": 0, "y1": 0, "x2": 30, "y2": 25}
        ])
        .to_string();
        let (status, body) = upload(state, &image, &crop_areas).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["4030", "No detection", "3025"]));
    }

    #[tokio::test]
    async fn test_blank_region_is_no_detection() {
        let reader = Arc::new(InkReader::new("5"));
        let state = state_with(reader.clone());
        let image = encode_png(&blank_page(40, 40));

        let (status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 40, "y2": 40}]"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["No detection"]));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_digits_are_stripped() {
        let state = state_with(Arc::new(InkReader::new("48-2")));
        let image = encode_png(&page_with_centered_ink());

        let (_status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#).await;

        assert_eq!(body["results"], json!(["482"]));
    }

    #[tokio::test]
    async fn test_browser_style_fractional_coordinates() {
        let state = state_with(Arc::new(SizeReader));
        let image = encode_png(&page_with_centered_ink());

        // The front end sends fractional CSS pixel offsets
        let (status, body) = upload(
            state,
            &image,
            r#"[{"x1": 40.6, "y1": 10.2, "x2": 60.9, "y2": "40"}]"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["2030"]));
    }

    #[tokio::test]
    async fn test_jpeg_upload() {
        let state = state_with(Arc::new(InkReader::new("9")));
        let image = encode(&page_with_centered_ink(), image::ImageFormat::Jpeg);

        let (status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["9"]));
    }

    #[tokio::test]
    async fn test_empty_region_list() {
        let reader = Arc::new(InkReader::new("1"));
        let state = state_with(reader.clone());
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(state, &image, "[]").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "results": []}));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeat_request_is_identical() {
        let image = encode_png(&page_with_centered_ink());
        let crop_areas = r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}, {"x1": 0, "y1": 0, "x2": 20, "y2": 20}]"#;
        let recognizer = Arc::new(SizeReader);

        let (_, first) = upload(state_with(recognizer.clone()), &image, crop_areas).await;
        let (_, second) = upload(state_with(recognizer), &image, crop_areas).await;

        assert_eq!(first, second);
        assert_eq!(first["results"], json!(["10050", "No detection"]));
    }

    #[tokio::test]
    async fn test_first_crop_areas_field_wins() {
        let state = state_with(Arc::new(SizeReader));
        let image = encode_png(&page_with_centered_ink());
        let (content_type, body) = MultipartBuilder::new()
            .text("crop_areas", r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#)
            .text("note", "ignored")
            .file("image", "upload.png", &image)
            .text("crop_areas", r#"[{"x1": 0, "y1": 0, "x2": 1, "y2": 1}, {"x1": 0, "y1": 0, "x2": 2, "y2": 2}]"#)
            .build();

        let (status, body) = post_process(state, &content_type, body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["10050"]));
    }

    // =============================================================================
    // Per-region failures keep the batch alive
    // =============================================================================

    #[tokio::test]
    async fn test_invalid_regions_are_isolated() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let image = encode_png(&page_with_centered_ink());
        let crop_areas = json!([
            {"x1": 60, "y1": 0, "x2": 20, "y2": 50},
            {"x1": 0, "y1": 0, "x2": 100, "y2": 50},
            {"x1": 0, "y1": 0, "x2": 150, "y2": 50}
        ])
        .to_string();

        let (status, body) = upload(state, &image, &crop_areas).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].as_str().unwrap().starts_with("Error: empty region"));
        assert_eq!(results[1], "7");
        assert!(results[2]
            .as_str()
            .unwrap()
            .starts_with("Error: region x1=0, y1=0, x2=150, y2=50 lies outside the 100x50 image"));
    }

    #[tokio::test]
    async fn test_clamp_policy_trims_overhang() {
        let state = state_with_policy(Arc::new(SizeReader), RegionPolicy::Clamp);
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(state, &image, r#"[{"x1": -20, "y1": 0, "x2": 150, "y2": 50}]"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!(["10050"]));
    }

    #[tokio::test]
    async fn test_recognizer_failure_is_per_region() {
        let state = state_with(Arc::new(BrokenReader));
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(
            state,
            &image,
            r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}, {"x1": 0, "y1": 0, "x2": 10, "y2": 10}]"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        for result in results {
            assert!(result
                .as_str()
                .unwrap()
                .starts_with("Error: recognition failed"));
        }
    }

    // =============================================================================
    // Whole-request errors
    // =============================================================================

    #[tokio::test]
    async fn test_malformed_crop_areas() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(state, &image, "[{'x1': 0, 'y1': 0, 'x2': 100, 'y2': 50}]").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("crop_areas"));
        assert!(body.get("results").is_none());
    }

    #[tokio::test]
    async fn test_crop_areas_with_extra_keys() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(
            state,
            &image,
            r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50, "__class__": "x"}]"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_missing_image_field() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let (content_type, body) = MultipartBuilder::new()
            .text("crop_areas", "[]")
            .build();

        let (status, body) = post_process(state, &content_type, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("image"));
    }

    #[tokio::test]
    async fn test_missing_crop_areas_field() {
        let state = state_with(Arc::new(InkReader::new("7")));
        let image = encode_png(&page_with_centered_ink());
        let (content_type, body) = MultipartBuilder::new()
            .file("image", "upload.png", &image)
            .build();

        let (status, body) = post_process(state, &content_type, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("crop_areas"));
    }

    #[tokio::test]
    async fn test_undecodable_image() {
        let state = state_with(Arc::new(InkReader::new("7")));

        let (status, body) = upload(
            state,
            b"GIF89a-but-not-really",
            r#"[{"x1": 0, "y1": 0, "x2": 1, "y2": 1}]"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("image"));
    }

    #[tokio::test]
    async fn test_unsupported_image_format() {
        let state = state_with(Arc::new(InkReader::new("7")));

        let (status, body) = upload(state, b"plain text", "[]").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Unsupported image format"));
    }

    #[tokio::test]
    async fn test_image_just_over_limit_is_reported_as_too_large() {
        let image = encode_png(&page_with_centered_ink());
        let mut state = state_with(Arc::new(InkReader::new("7")));
        state.max_upload_bytes = image.len() - 1;

        let (status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#).await;

        // Multipart framing fits in the body limit; the image check rejects it
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_413() {
        let mut state = state_with(Arc::new(InkReader::new("7")));
        state.max_upload_bytes = 1024;
        let oversized = vec![0u8; 256 * 1024];

        let (status, body) = upload(state, &oversized, "[]").await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Payload too large"));
    }

    #[tokio::test]
    async fn test_engine_unavailable() {
        let state = state_without_engine();
        let image = encode_png(&page_with_centered_ink());

        let (status, body) = upload(state, &image, r#"[{"x1": 0, "y1": 0, "x2": 100, "y2": 50}]"#).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({"status": "error", "message": "Service unavailable: OCR engine not loaded"})
        );
    }

    #[tokio::test]
    async fn test_non_multipart_body() {
        let state = state_with(Arc::new(InkReader::new("7")));

        let (status, body) = post_process(
            state,
            "application/json",
            br#"{"crop_areas": []}"#.to_vec(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }
}
