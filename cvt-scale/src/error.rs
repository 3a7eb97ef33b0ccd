// SPDX-License-Identifier: MIT
// Errors raised by scale planning and the CPU resample/crop path.

use fast_image_resize as fir;

use crate::plan::Size;

#[derive(Debug)]
pub enum ScaleError {
    /// A width or height was zero.
    InvalidDimension { name: &'static str, value: u32 },
    /// A `WxH` string could not be parsed.
    InvalidSize(String),
    /// The crop rectangle does not lie inside the scaled frame.
    CropOutOfBounds {
        scaled: Size,
        output: Size,
        crop_x: i64,
        crop_y: i64,
    },
    /// A scaled side does not fit in `u32`.
    ScaledTooLarge { input: Size, output: Size, side: u64 },
    /// Source pixels do not have the size the plan was built for.
    SizeMismatch { expected: Size, actual: Size },
    UnsupportedChannels(u8),
    BufferTooSmall { expected: usize, actual: usize },
    StrideTooSmall { stride: usize, row_bytes: usize },
    StrideMismatchAndNoStaging,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::InvalidDimension { name, value } => {
                write!(f, "Invalid dimension: {} must be positive, got {}", name, value)
            }
            ScaleError::InvalidSize(s) => write!(f, "Invalid size '{}': expected WIDTHxHEIGHT", s),
            ScaleError::CropOutOfBounds { scaled, output, crop_x, crop_y } => write!(
                f,
                "Crop of {} at ({}, {}) does not fit inside scaled frame {}",
                output, crop_x, crop_y, scaled
            ),
            ScaleError::ScaledTooLarge { input, output, side } => write!(
                f,
                "Scaling {} to cover {} needs a side of {} pixels, which does not fit in u32",
                input, output, side
            ),
            ScaleError::SizeMismatch { expected, actual } => {
                write!(f, "Source size mismatch: expected {}, got {}", expected, actual)
            }
            ScaleError::UnsupportedChannels(c) => write!(f, "Unsupported channel count: {}", c),
            ScaleError::BufferTooSmall { expected, actual } => {
                write!(f, "Pixel buffer too small: need {} bytes, got {}", expected, actual)
            }
            ScaleError::StrideTooSmall { stride, row_bytes } => {
                write!(f, "Row stride {} is smaller than row size {}", stride, row_bytes)
            }
            ScaleError::StrideMismatchAndNoStaging => write!(f, "Stride mismatch but no staging buffer provided"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}
