//! # Frame Resolution Conversion Library
//!
//! Converts frames captured at one fixed resolution into frames of another fixed resolution,
//! preserving aspect ratio with a single shared scale factor and cutting away the excess with a
//! centered crop. Frames are never padded.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `config`: validated, immutable [`ConversionConfig`] and its TOML loader
//! - `frame`: the immutable, reference-counted [`Frame`]
//! - `processing`: [`FrameConverter`], which memoizes the scale decision and converts frames
//! - `capture`: the [`FrameSource`] seam and the read-through [`ConvertingSource`]
//! - `session`: [`ConversionSession`], an async worker for background capture loops
//! - `error`: structured [`ConvertError`] with context and classification traits
//!
//! Scale selection and pixel work live in the `cvt-scale` crate.
//!
//! ## Example
//!
//! ```rust
//! use frame_cvt::{ConversionConfig, Frame, FrameConverter};
//!
//! # fn main() -> Result<(), frame_cvt::ConvertError> {
//! let config = ConversionConfig::new(1280, 1024, 640, 360)?;
//! let converter = FrameConverter::new(config)?;
//!
//! let frame = Frame::filled(1280, 1024, &[0, 128, 255])?;
//! let out = converter.convert(&frame)?;
//! assert_eq!((out.width(), out.height(), out.channels()), (640, 360, 3));
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod frame;
pub mod processing;
pub mod session;

pub use capture::{ConvertingSource, FrameSource};
pub use config::ConversionConfig;
pub use cvt_scale::{ScaleDecision, ScalePolicy, Size, compute_scale_factor};
pub use error::{
    ConvertError, ConvertResult, ErrorSeverity, HasRecoverySuggestion, HasSeverity, Retryable,
};
pub use frame::Frame;
pub use processing::{FrameConverter, convert};
pub use session::ConversionSession;
