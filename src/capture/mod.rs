//! # Capture Module
//!
//! Frame source abstraction and the read-through converting wrapper.

pub mod source;

pub use source::{ConvertingSource, FrameSource};
