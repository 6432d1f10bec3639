// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Region pipeline tests on encoded images
//!
//! These tests run the pipeline from raw file bytes, the way the HTTP
//! handler calls it.

use image::ImageFormat;
use region_ocr::vision::ocr::{
    Region, RegionError, RegionOutcome, RegionPipeline, RegionPolicy, NO_DETECTION,
};
use region_ocr::vision::ImageError;
use region_ocr::vision::ocr::PipelineError;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::common::{
    blank_page, encode, encode_png, ink, page_with_centered_ink, InkReader, SizeReader,
};

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_png_full_bounds() {
        let pipeline = RegionPipeline::new(Arc::new(InkReader::new("7")));
        let bytes = encode_png(&page_with_centered_ink());

        let outcomes = pipeline.process(&bytes, &[Region::full(100, 50)]).unwrap();
        assert_eq!(outcomes, vec![RegionOutcome::Digits("7".to_string())]);
    }

    #[test]
    fn test_jpeg_and_bmp_inputs() {
        for format in [ImageFormat::Jpeg, ImageFormat::Bmp] {
            let pipeline = RegionPipeline::new(Arc::new(SizeReader));
            let bytes = encode(&page_with_centered_ink(), format);

            let outcomes = pipeline
                .process(&bytes, &[Region::new(40, 10, 60, 40)])
                .unwrap();
            assert_eq!(
                outcomes,
                vec![RegionOutcome::Digits("2030".to_string())],
                "format {:?}",
                format
            );
        }
    }

    #[test]
    fn test_crop_is_rows_by_columns() {
        // Ink only in the right half: a transposed crop would miss it
        let mut page = blank_page(80, 20);
        ink(&mut page, 60, 2, 10, 10);
        let pipeline = RegionPipeline::new(Arc::new(SizeReader));

        let outcomes = pipeline
            .process(
                &encode_png(&page),
                &[Region::new(50, 0, 80, 20), Region::new(0, 0, 20, 20)],
            )
            .unwrap();
        assert_eq!(outcomes[0], RegionOutcome::Digits("3020".to_string()));
        assert_eq!(outcomes[1], RegionOutcome::NoDetection);
        assert_eq!(outcomes[1].to_result_string(), NO_DETECTION);
    }

    #[test]
    fn test_every_region_is_recognized() {
        let reader = Arc::new(InkReader::new("5"));
        let pipeline = RegionPipeline::new(reader.clone());
        let regions = vec![Region::full(100, 50); 4];

        let outcomes = pipeline
            .process(&encode_png(&page_with_centered_ink()), &regions)
            .unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_rejected_region_skips_recognizer() {
        let reader = Arc::new(InkReader::new("5"));
        let pipeline = RegionPipeline::new(reader.clone());

        let outcomes = pipeline
            .process(
                &encode_png(&page_with_centered_ink()),
                &[Region::new(10, 10, 10, 20), Region::new(0, 0, 101, 50)],
            )
            .unwrap();
        assert!(matches!(outcomes[0], RegionOutcome::Failed(RegionError::Empty { .. })));
        assert!(matches!(
            outcomes[1],
            RegionOutcome::Failed(RegionError::OutOfBounds { width: 100, height: 50, .. })
        ));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clamp_policy_on_encoded_image() {
        let pipeline =
            RegionPipeline::new(Arc::new(SizeReader)).with_policy(RegionPolicy::Clamp);

        let outcomes = pipeline
            .process(
                &encode_png(&page_with_centered_ink()),
                &[Region::new(30, -5, 70, 500), Region::new(120, 0, 140, 50)],
            )
            .unwrap();
        assert_eq!(outcomes[0], RegionOutcome::Digits("4050".to_string()));
        assert!(matches!(outcomes[1], RegionOutcome::Failed(RegionError::Empty { .. })));
    }

    #[test]
    fn test_empty_upload() {
        let pipeline = RegionPipeline::new(Arc::new(SizeReader));
        let err = pipeline.process(&[], &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Image(ImageError::EmptyData)));
    }

    #[test]
    fn test_truncated_png() {
        let pipeline = RegionPipeline::new(Arc::new(SizeReader));
        let bytes = encode_png(&page_with_centered_ink());

        let err = pipeline.process(&bytes[..bytes.len() / 2], &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Image(ImageError::DecodeFailed(_))));
    }
}
