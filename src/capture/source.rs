//! # Converting Frame Sources
//!
//! Frame acquisition is out of scope for this crate: devices, files and network feeds plug in
//! through the [`FrameSource`] trait. [`ConvertingSource`] wraps any source and hands out frames
//! that are already converted to the configured output size.

use std::fmt;

use cvt_scale::Size;
use tracing::debug;

use crate::config::ConversionConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::frame::Frame;
use crate::processing::FrameConverter;

/// Anything that produces frames of a fixed size.
pub trait FrameSource: Send {
    /// Human-readable identifier (device index, path, ...).
    fn name(&self) -> String;

    /// Native size of the frames returned by [`FrameSource::read`].
    fn input_size(&self) -> Size;

    /// Block until the next frame is available.
    fn read(&mut self) -> ConvertResult<Frame>;
}

/// A [`FrameSource`] whose frames come out at the configured output size.
pub struct ConvertingSource<S: FrameSource> {
    source: S,
    converter: FrameConverter,
    frames_read: u64,
}

impl<S: FrameSource> ConvertingSource<S> {
    /// Wrap `source`. Its declared size must equal the configured input size.
    pub fn new(source: S, config: ConversionConfig) -> ConvertResult<Self> {
        if source.input_size() != config.input() {
            return Err(ConvertError::dimension_mismatch(config.input(), source.input_size())
                .with_operation("open_source")
                .with_context(source.name()));
        }
        let converter = FrameConverter::new(config)?;
        Ok(Self {
            source,
            converter,
            frames_read: 0,
        })
    }

    /// Size of the frames returned by [`ConvertingSource::read`].
    pub fn output_size(&self) -> Size {
        self.converter.config().output()
    }

    pub fn needs_conversion(&self) -> bool {
        self.converter.needs_conversion()
    }

    pub fn converter(&self) -> &FrameConverter {
        &self.converter
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next frame from the wrapped source, converting it if needed.
    pub fn read(&mut self) -> ConvertResult<Frame> {
        let frame = self.source.read()?;
        self.frames_read += 1;
        if !self.needs_conversion() {
            return Ok(frame);
        }
        self.converter.convert(&frame).map_err(|e| {
            debug!(source = %self.source.name(), frame = self.frames_read, error = %e, "conversion failed");
            e.with_context(self.source.name())
                .with_metadata("frame", self.frames_read.to_string())
        })
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: FrameSource> fmt::Display for ConvertingSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConvertingSource({})", self.source.name())?;
        if self.needs_conversion() {
            write!(f, " (converted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Solid {
        size: Size,
        reads: u32,
    }

    impl FrameSource for Solid {
        fn name(&self) -> String {
            "solid".to_string()
        }

        fn input_size(&self) -> Size {
            self.size
        }

        fn read(&mut self) -> ConvertResult<Frame> {
            self.reads += 1;
            Frame::filled(self.size.w, self.size.h, &[self.reads as u8, 0, 0])
        }
    }

    #[test]
    fn test_read_converts() {
        let config = ConversionConfig::new(128, 96, 64, 36).unwrap();
        let mut source = ConvertingSource::new(Solid { size: Size::new(128, 96), reads: 0 }, config).unwrap();
        assert_eq!(source.to_string(), "ConvertingSource(solid) (converted)");

        let frame = source.read().unwrap();
        assert_eq!(frame.size(), Size::new(64, 36));
        assert_eq!(frame.channels(), 3);
        assert_eq!(source.frames_read(), 1);
    }

    #[test]
    fn test_passthrough_display() {
        let config = ConversionConfig::new(32, 32, 32, 32).unwrap();
        let mut source = ConvertingSource::new(Solid { size: Size::new(32, 32), reads: 0 }, config).unwrap();
        assert_eq!(source.to_string(), "ConvertingSource(solid)");
        assert_eq!(source.read().unwrap().size(), Size::new(32, 32));
    }

    #[test]
    fn test_source_size_must_match() {
        let config = ConversionConfig::new(1280, 1024, 640, 360).unwrap();
        let err = ConvertingSource::new(Solid { size: Size::new(640, 480), reads: 0 }, config)
            .err()
            .unwrap();
        assert!(matches!(err, ConvertError::DimensionMismatch { .. }));
    }
}
