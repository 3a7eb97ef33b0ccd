//! Integration tests for frame conversion
//!
//! These tests drive the public API end to end: configuration, scale selection, resampling and
//! center cropping, plus the converting source wrapper.

mod common;

use common::assertions::{assert_frame_size, assert_solid_color};
use common::mock_source::MockSource;
use common::test_frames::*;
use frame_cvt::{
    ConversionConfig, ConvertError, ConvertingSource, ErrorSeverity, FrameConverter, HasSeverity,
    Retryable, ScalePolicy, Size, compute_scale_factor, convert,
};

fn converter(input: Size, output: Size) -> FrameConverter {
    FrameConverter::new(ConversionConfig::new(input.w, input.h, output.w, output.h).unwrap()).unwrap()
}

#[test]
fn test_uniform_downscale_without_crop() {
    let conv = converter(FHD_SIZE, NHD_SIZE);
    let decision = conv.decision();
    assert_eq!(decision.scale_factor, 1.0 / 3.0);
    assert_eq!(decision.scaled, NHD_SIZE);
    assert!(!decision.needs_crop());

    let out = conv.convert(&create_solid_frame(FHD_SIZE, 12, 34, 56)).unwrap();
    assert_frame_size(&out, NHD_SIZE);
    assert_solid_color(&out, &[12, 34, 56]);
}

#[test]
fn test_downscale_with_vertical_crop() {
    let conv = converter(SXGA_SIZE, NHD_SIZE);
    let decision = conv.decision();
    assert_eq!(decision.scale_factor, 0.5);
    assert_eq!(decision.scaled, Size::new(640, 512));
    assert_eq!((decision.crop_x, decision.crop_y), (0, 76));

    // Rows 0..512 of the scaled frame are black then white at 256; the crop keeps 76..436,
    // so the boundary lands at output row 180.
    let out = conv.convert(&create_split_frame(SXGA_SIZE)).unwrap();
    assert_frame_size(&out, NHD_SIZE);
    assert_eq!(out.pixel(320, 0), &[0]);
    assert_eq!(out.pixel(320, 170), &[0]);
    assert_eq!(out.pixel(320, 190), &[255]);
    assert_eq!(out.pixel(320, 359), &[255]);
}

#[test]
fn test_growth_is_crop_error_under_gentle_policy() {
    let config = ConversionConfig::new(640, 480, 1280, 720).unwrap();
    assert_eq!(compute_scale_factor(VGA_SIZE, HD_SIZE).unwrap(), 1.5);

    let err = convert(&create_solid_frame(VGA_SIZE, 1, 2, 3), &config).unwrap_err();
    match &err {
        ConvertError::CropOutOfBounds {
            scaled,
            output,
            crop_x,
            crop_y,
            ..
        } => {
            assert_eq!(*scaled, Size::new(960, 720));
            assert_eq!(*output, HD_SIZE);
            assert_eq!((*crop_x, *crop_y), (-160, 0));
        }
        other => panic!("expected CropOutOfBounds, got {other}"),
    }
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
    assert!(!err.is_retryable());
}

#[test]
fn test_growth_crops_under_cover_policy() {
    let config = ConversionConfig::new(640, 480, 1280, 720)
        .unwrap()
        .with_policy(ScalePolicy::Cover);
    let out = convert(&create_solid_frame(VGA_SIZE, 90, 60, 30), &config).unwrap();
    assert_frame_size(&out, HD_SIZE);
    assert_solid_color(&out, &[90, 60, 30]);
}

#[test]
fn test_identity_returns_input() {
    let frame = create_gradient_frame(HD_SIZE).with_pts(1_000);
    let config = ConversionConfig::new(1280, 720, 1280, 720).unwrap();
    assert_eq!(config.decision().unwrap().scale_factor, 1.0);

    let out = convert(&frame, &config).unwrap();
    assert_eq!(out, frame);
    assert_eq!(out.pts_ns(), Some(1_000));
}

#[test]
fn test_output_size_always_matches_config() {
    let cases = [
        (FHD_SIZE, NHD_SIZE),
        (SXGA_SIZE, NHD_SIZE),
        (HD_SIZE, VGA_SIZE),
        (VGA_SIZE, Size::new(480, 480)),
        (Size::new(333, 211), Size::new(100, 57)),
        (Size::new(100, 100), Size::new(50, 150)),
    ];
    for (input, output) in cases {
        for policy in [ScalePolicy::Gentle, ScalePolicy::Cover] {
            let config = ConversionConfig::new(input.w, input.h, output.w, output.h)
                .unwrap()
                .with_policy(policy);
            match convert(&create_gradient_frame(input), &config) {
                Ok(out) => {
                    assert_frame_size(&out, output);
                    assert_eq!(out.channels(), 3);
                }
                Err(ConvertError::CropOutOfBounds { .. }) => {
                    assert_eq!(policy, ScalePolicy::Gentle, "cover must always fit: {input} -> {output}");
                    assert!(!config.decision().unwrap().fits());
                }
                Err(e) => panic!("{input} -> {output} ({policy:?}): {e}"),
            }
        }
    }
}

#[test]
fn test_wrong_frame_size_is_rejected() {
    let conv = converter(SXGA_SIZE, NHD_SIZE);
    let err = conv.convert(&create_solid_frame(VGA_SIZE, 0, 0, 0)).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::DimensionMismatch { expected, actual, .. }
            if expected == SXGA_SIZE && actual == VGA_SIZE
    ));
}

#[test]
fn test_invalid_dimensions_fail_at_construction() {
    assert!(matches!(
        ConversionConfig::new(1280, 1024, 0, 360),
        Err(ConvertError::InvalidDimension { .. })
    ));
    assert!(matches!(
        ConversionConfig::from_signed(-1, 1024, 640, 360),
        Err(ConvertError::InvalidDimension { value: -1, .. })
    ));
}

#[test]
fn test_converting_source_surfaces_bad_frames_and_continues() {
    let config = ConversionConfig::new(128, 96, 64, 36).unwrap();
    let mut source = ConvertingSource::new(MockSource::new(Size::new(128, 96)).with_bad_frame_at(1), config)
        .unwrap();

    let first = source.read().unwrap();
    assert_frame_size(&first, Size::new(64, 36));
    assert_solid_color(&first, &[0, 100, 200]);

    let err = source.read().unwrap_err();
    assert!(matches!(err, ConvertError::DimensionMismatch { .. }));
    assert_eq!(err.context().metadata.get("frame").map(String::as_str), Some("2"));

    let third = source.read().unwrap();
    assert_solid_color(&third, &[2, 100, 200]);
    assert_eq!(third.pts_ns(), Some(2 * 33_333_333));
}

#[test]
fn test_converter_shared_across_threads() {
    let conv = std::sync::Arc::new(converter(SXGA_SIZE, NHD_SIZE));
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let conv = std::sync::Arc::clone(&conv);
            std::thread::spawn(move || {
                let out = conv.convert(&create_solid_frame(SXGA_SIZE, i, i, i)).unwrap();
                assert_solid_color(&out, &[i, i, i]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
