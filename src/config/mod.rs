//! # Configuration Module
//!
//! This module provides the validated conversion configuration and its TOML loader.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::ConversionConfig;
