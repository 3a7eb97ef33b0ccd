//! Common test utilities and helpers for the frame conversion tests
//!
//! Frame generators, a scripted frame source and custom assertions shared by the
//! integration tests.

#![allow(dead_code)]

/// Test frame utilities and constants
pub mod test_frames {
    use frame_cvt::{Frame, Size};

    /// Standard test sizes
    pub const FHD_SIZE: Size = Size::new(1920, 1080);
    pub const SXGA_SIZE: Size = Size::new(1280, 1024);
    pub const VGA_SIZE: Size = Size::new(640, 480);
    pub const NHD_SIZE: Size = Size::new(640, 360);
    pub const HD_SIZE: Size = Size::new(1280, 720);

    /// Create a solid color RGB test frame
    pub fn create_solid_frame(size: Size, r: u8, g: u8, b: u8) -> Frame {
        Frame::filled(size.w, size.h, &[r, g, b]).expect("valid solid frame")
    }

    /// Create a frame whose top half is black and bottom half is white (gray, 1 channel)
    pub fn create_split_frame(size: Size) -> Frame {
        let mut data = vec![0u8; size.area()];
        let half = (size.h / 2) as usize * size.w as usize;
        data[half..].fill(255);
        Frame::new(size.w, size.h, 1, data).expect("valid split frame")
    }

    /// Create a gradient frame for testing scaling (RGB, red follows x, green follows y)
    pub fn create_gradient_frame(size: Size) -> Frame {
        let mut data = Vec::with_capacity(size.area() * 3);
        for y in 0..size.h {
            for x in 0..size.w {
                let r = ((x as f32 / size.w as f32) * 255.0) as u8;
                let g = ((y as f32 / size.h as f32) * 255.0) as u8;
                data.extend_from_slice(&[r, g, 128]);
            }
        }
        Frame::new(size.w, size.h, 3, data).expect("valid gradient frame")
    }
}

/// Scripted frame source for testing without a capture device
pub mod mock_source {
    use frame_cvt::{ConvertResult, Frame, FrameSource, Size};

    use super::test_frames::create_solid_frame;

    /// Produces solid frames whose red channel counts reads; can be told to emit one
    /// wrong-sized frame.
    pub struct MockSource {
        pub size: Size,
        pub frame_count: u32,
        pub bad_frame_at: Option<u32>,
    }

    impl MockSource {
        pub fn new(size: Size) -> Self {
            Self {
                size,
                frame_count: 0,
                bad_frame_at: None,
            }
        }

        pub fn with_bad_frame_at(mut self, index: u32) -> Self {
            self.bad_frame_at = Some(index);
            self
        }
    }

    impl FrameSource for MockSource {
        fn name(&self) -> String {
            "mock".to_string()
        }

        fn input_size(&self) -> Size {
            self.size
        }

        fn read(&mut self) -> ConvertResult<Frame> {
            let index = self.frame_count;
            self.frame_count += 1;
            let size = if self.bad_frame_at == Some(index) {
                Size::new(self.size.w / 2, self.size.h / 2)
            } else {
                self.size
            };
            Ok(create_solid_frame(size, index as u8, 100, 200).with_pts(index as u64 * 33_333_333))
        }
    }
}

/// Custom assertions for testing
pub mod assertions {
    use frame_cvt::{Frame, Size};

    /// Assert that a frame has the expected size
    pub fn assert_frame_size(frame: &Frame, expected: Size) {
        assert_eq!(
            frame.size(),
            expected,
            "Frame size mismatch: expected {}, got {}",
            expected,
            frame.size()
        );
        assert_eq!(
            frame.data().len(),
            expected.area() * frame.channels() as usize,
            "Frame data length mismatch"
        );
    }

    /// Assert that every pixel of a frame equals `expected`
    pub fn assert_solid_color(frame: &Frame, expected: &[u8]) {
        assert_eq!(frame.channels() as usize, expected.len(), "Channel count mismatch");
        for pixel in frame.data().chunks_exact(expected.len()) {
            assert_eq!(pixel, expected, "Pixel mismatch");
        }
    }
}
