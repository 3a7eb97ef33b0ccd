//! # Conversion Error Handling
//!
//! Structured error type for the frame conversion library. Every variant carries an
//! [`ErrorContext`] with the operation being performed, optional free-form context,
//! a severity and arbitrary key/value metadata.
//!
//! ## Error Classification
//!
//! - [`Retryable`]: no conversion failure is transient. The same inputs always fail the same
//!   way, so `is_retryable` is `false` for every variant.
//! - [`HasSeverity`]: `CropOutOfBounds` is [`ErrorSeverity::Fatal`] (it is a logic error in the
//!   scale selection); everything else defaults to [`ErrorSeverity::Error`].
//! - [`HasRecoverySuggestion`]: a short hint for the caller (skip the frame, fix the config...).
//!
//! ## Usage
//!
//! ```rust
//! use frame_cvt::error::{ConvertError, HasSeverity, Retryable};
//! use frame_cvt::Size;
//!
//! let error = ConvertError::dimension_mismatch(Size::new(1280, 1024), Size::new(640, 480))
//!     .with_operation("convert")
//!     .with_metadata("camera", "0");
//!
//! assert!(!error.is_retryable());
//! assert_eq!(error.category(), "dimension_mismatch");
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

use cvt_scale::{ScaleError, Size};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that affect operation but leave the converter usable
    Error,
    /// Logic errors; the configuration must not be used any further
    Fatal,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Error type for frame conversion
#[derive(Debug)]
pub enum ConvertError {
    /// A declared dimension is zero or negative
    InvalidDimension {
        field: String,
        value: i64,
        context: ErrorContext,
    },
    /// A frame does not have the configured input size
    DimensionMismatch {
        expected: Size,
        actual: Size,
        context: ErrorContext,
    },
    /// The center crop would leave the scaled frame
    CropOutOfBounds {
        scaled: Size,
        output: Size,
        crop_x: i64,
        crop_y: i64,
        context: ErrorContext,
    },
    /// Configuration validation or parsing errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// Pixel layout the resampler cannot handle
    UnsupportedChannels { channels: usize, context: ErrorContext },
    /// Pixel buffer does not match the declared frame layout
    InvalidFrame { reason: String, context: ErrorContext },
    /// Resampling backend failures
    Resize {
        reason: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Image decode/encode errors
    Image {
        operation: String,
        source: image::ImageError,
        context: ErrorContext,
    },
    /// Async session failures (worker gone, task panicked)
    Session { reason: String, context: ErrorContext },
}

impl ConvertError {
    /// Create an invalid dimension error
    pub fn invalid_dimension(field: impl Into<String>, value: i64) -> Self {
        Self::InvalidDimension {
            field: field.into(),
            value,
            context: ErrorContext::new(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: Size, actual: Size) -> Self {
        Self::DimensionMismatch {
            expected,
            actual,
            context: ErrorContext::new(),
        }
    }

    /// Create a crop out of bounds error
    pub fn crop_out_of_bounds(scaled: Size, output: Size, crop_x: i64, crop_y: i64) -> Self {
        Self::CropOutOfBounds {
            scaled,
            output,
            crop_x,
            crop_y,
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an unsupported channel count error
    pub fn unsupported_channels(channels: impl Into<usize>) -> Self {
        Self::UnsupportedChannels {
            channels: channels.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an invalid frame layout error
    pub fn invalid_frame(reason: impl Into<String>) -> Self {
        Self::InvalidFrame {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a resize error
    pub fn resize(reason: impl Into<String>) -> Self {
        Self::Resize {
            reason: reason.into(),
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an image codec error
    pub fn image(operation: impl Into<String>, source: image::ImageError) -> Self {
        Self::Image {
            operation: operation.into(),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a session error
    pub fn session(reason: impl Into<String>) -> Self {
        Self::Session {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Attach a file path to I/O errors; no-op for other variants
    pub fn with_path(mut self, p: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(p.into());
        }
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidDimension { context, .. }
            | Self::DimensionMismatch { context, .. }
            | Self::CropOutOfBounds { context, .. }
            | Self::Config { context, .. }
            | Self::UnsupportedChannels { context, .. }
            | Self::InvalidFrame { context, .. }
            | Self::Resize { context, .. }
            | Self::Io { context, .. }
            | Self::Image { context, .. }
            | Self::Session { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidDimension { context, .. }
            | Self::DimensionMismatch { context, .. }
            | Self::CropOutOfBounds { context, .. }
            | Self::Config { context, .. }
            | Self::UnsupportedChannels { context, .. }
            | Self::InvalidFrame { context, .. }
            | Self::Resize { context, .. }
            | Self::Io { context, .. }
            | Self::Image { context, .. }
            | Self::Session { context, .. } => context,
        }
    }

    /// Stable category name, used as a log field
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDimension { .. } => "invalid_dimension",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::CropOutOfBounds { .. } => "crop_out_of_bounds",
            Self::Config { .. } => "config",
            Self::UnsupportedChannels { .. } => "unsupported_channels",
            Self::InvalidFrame { .. } => "invalid_frame",
            Self::Resize { .. } => "resize",
            Self::Io { .. } => "io",
            Self::Image { .. } => "image",
            Self::Session { .. } => "session",
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { field, value, .. } => {
                write!(f, "Invalid dimension: {} must be positive, got {}", field, value)
            }
            Self::DimensionMismatch { expected, actual, .. } => {
                write!(f, "Frame size mismatch: expected {}, got {}", expected, actual)
            }
            Self::CropOutOfBounds {
                scaled,
                output,
                crop_x,
                crop_y,
                ..
            } => write!(
                f,
                "Crop out of bounds: {} at ({}, {}) does not fit inside scaled frame {}",
                output, crop_x, crop_y, scaled
            ),
            Self::Config {
                field,
                value,
                reason,
                ..
            } => write!(f, "Configuration error in '{}' (value: '{}'): {}", field, value, reason),
            Self::UnsupportedChannels { channels, .. } => {
                write!(f, "Unsupported channel count: {} (expected 1-4)", channels)
            }
            Self::InvalidFrame { reason, .. } => write!(f, "Invalid frame: {}", reason),
            Self::Resize { reason, .. } => write!(f, "Resize failed: {}", reason),
            Self::Io {
                operation, path, source, ..
            } => match path {
                Some(p) => write!(f, "I/O error during '{}' on '{}': {}", operation, p, source),
                None => write!(f, "I/O error during '{}': {}", operation, source),
            },
            Self::Image { operation, source, .. } => {
                write!(f, "Image error during '{}': {}", operation, source)
            }
            Self::Session { reason, .. } => write!(f, "Conversion session error: {}", reason),
        }?;

        if let Some(op) = &self.context().operation {
            write!(f, " [operation: {}]", op)?;
        }
        if let Some(ctx) = &self.context().context {
            write!(f, " [context: {}]", ctx)?;
        }
        Ok(())
    }
}

impl StdError for ConvertError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Resize {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            Self::Io { source, .. } => Some(source),
            Self::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that may succeed when the same operation is attempted again
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Errors that carry a severity level
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

/// Errors that can suggest what the caller should do next
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&'static str>;
}

impl Retryable for ConvertError {
    fn is_retryable(&self) -> bool {
        // Conversion is deterministic: identical inputs fail identically.
        false
    }
}

impl HasSeverity for ConvertError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

impl HasRecoverySuggestion for ConvertError {
    fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidDimension { .. } => Some("Use strictly positive widths and heights"),
            Self::DimensionMismatch { .. } => {
                Some("Check that the frame source delivers the configured input size, or skip the frame")
            }
            Self::CropOutOfBounds { .. } => {
                Some("Use the 'cover' scale policy so both scaled sides reach the output size")
            }
            Self::Config { .. } => Some("Fix the configuration value and reload"),
            Self::UnsupportedChannels { .. } => Some("Convert frames to gray, gray+alpha, RGB or RGBA first"),
            Self::InvalidFrame { .. } => Some("Pass a buffer of at least stride * height bytes with stride >= width * channels"),
            _ => None,
        }
    }
}

impl From<ScaleError> for ConvertError {
    fn from(err: ScaleError) -> Self {
        match err {
            ScaleError::InvalidDimension { name, value } => Self::invalid_dimension(name, value as i64),
            ScaleError::InvalidSize(s) => Self::config("size", s, "expected WIDTHxHEIGHT"),
            ScaleError::ScaledTooLarge { input, output, side } => Self::config(
                "output",
                format!("{} -> {}", input, output),
                format!("scaled side of {} pixels does not fit in u32", side),
            ),
            ScaleError::CropOutOfBounds {
                scaled,
                output,
                crop_x,
                crop_y,
            } => Self::crop_out_of_bounds(scaled, output, crop_x, crop_y),
            ScaleError::SizeMismatch { expected, actual } => Self::dimension_mismatch(expected, actual),
            ScaleError::UnsupportedChannels(c) => Self::unsupported_channels(c),
            other @ (ScaleError::BufferTooSmall { .. } | ScaleError::StrideTooSmall { .. }) => {
                Self::invalid_frame(other.to_string())
            }
            other @ (ScaleError::Fir(_) | ScaleError::ImageBuf(_)) => Self::Resize {
                reason: other.to_string(),
                source: Some(Box::new(other)),
                context: ErrorContext::new(),
            },
            other => Self::resize(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::io("unknown", err)
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        Self::image("unknown", err)
    }
}

impl From<toml::de::Error> for ConvertError {
    fn from(err: toml::de::Error) -> Self {
        Self::config("toml", "", err.to_string())
    }
}
