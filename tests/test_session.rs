//! Integration tests for the async conversion session
//!
//! These tests verify ordering, per-frame error delivery and graceful shutdown of the
//! background conversion worker.

mod common;

use std::time::Duration;

use common::assertions::{assert_frame_size, assert_solid_color};
use common::test_frames::{create_solid_frame, NHD_SIZE, SXGA_SIZE, VGA_SIZE};
use frame_cvt::{ConversionConfig, ConversionSession, ConvertError, FrameConverter};
use tokio::time::timeout;

fn session(capacity: usize) -> ConversionSession {
    let config = ConversionConfig::new(1280, 1024, 640, 360).unwrap();
    ConversionSession::spawn(FrameConverter::new(config).unwrap(), capacity)
}

#[tokio::test]
async fn test_frames_come_back_in_order() {
    let mut session = session(4);
    for i in 0..3u8 {
        session
            .submit(create_solid_frame(SXGA_SIZE, i, 0, 0).with_pts(i as u64))
            .await
            .unwrap();
    }

    for i in 0..3u8 {
        let frame = timeout(Duration::from_secs(10), session.next())
            .await
            .expect("session stalled")
            .expect("session closed early")
            .unwrap();
        assert_frame_size(&frame, NHD_SIZE);
        assert_solid_color(&frame, &[i, 0, 0]);
        assert_eq!(frame.pts_ns(), Some(i as u64));
    }

    assert!(session.shutdown().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_frame_does_not_stop_session() {
    let mut session = session(4);
    session.submit(create_solid_frame(VGA_SIZE, 1, 1, 1)).await.unwrap();
    session.submit(create_solid_frame(SXGA_SIZE, 2, 2, 2)).await.unwrap();

    let first = session.next().await.unwrap();
    assert!(matches!(first, Err(ConvertError::DimensionMismatch { .. })));

    let second = session.next().await.unwrap().unwrap();
    assert_solid_color(&second, &[2, 2, 2]);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_drains_pending_frames() {
    let mut session = session(2);
    session.submit(create_solid_frame(SXGA_SIZE, 5, 5, 5)).await.unwrap();
    session.submit(create_solid_frame(SXGA_SIZE, 6, 6, 6)).await.unwrap();
    session.close_input();

    let err = session.submit(create_solid_frame(SXGA_SIZE, 7, 7, 7)).await.unwrap_err();
    assert!(matches!(err, ConvertError::Session { .. }));

    let remaining = timeout(Duration::from_secs(10), session.shutdown())
        .await
        .expect("shutdown stalled")
        .unwrap();
    assert_eq!(remaining.len(), 2);
    for (result, expected) in remaining.into_iter().zip([5u8, 6]) {
        assert_solid_color(&result.unwrap(), &[expected; 3]);
    }
}
