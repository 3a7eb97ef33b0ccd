//! # Processing Module
//!
//! This module contains the frame converter: scale selection, resampling and center cropping.

#[allow(clippy::module_inception)]
pub mod processing;

// Re-export commonly used types for convenience
pub use processing::{FrameConverter, convert};
