// SPDX-License-Identifier: MIT
//! # cvt-scale: Fixed-Size Frame Conversion
//!
//! This crate turns frames of one fixed resolution into frames of another fixed resolution.
//! Aspect ratio is preserved by a single scale factor shared by both axes; whatever does not
//! fit the target is cut away by a centered crop. Nothing is ever padded.
//!
//! ## Key Components
//!
//! - [`plan`]: scale factor selection ([`plan::compute_scale_factor`]) and the full
//!   [`plan::ScaleDecision`] (scaled size, crop offsets, filter)
//! - [`cpu`]: resample and crop on raw interleaved pixels using fast_image_resize
//! - [`error`]: [`error::ScaleError`]
//!
//! ## Filters
//!
//! - shrinking (`scale_factor < 1.0`): area averaging
//! - enlarging (`scale_factor > 1.0`): cubic
//! - `scale_factor == 1.0`: no resample, crop only
//!
//! ## Usage Example
//!
//! ```rust
//! use cvt_scale::cpu::{scale_and_crop, SrcView};
//! use cvt_scale::plan::{build_plan, ScalePolicy, Size};
//!
//! # fn main() -> Result<(), cvt_scale::error::ScaleError> {
//! let input = Size::new(1280, 1024);
//! let plan = build_plan(input, Size::new(640, 360), ScalePolicy::Gentle)?;
//! assert_eq!(plan.scaled, Size::new(640, 512));
//! assert_eq!((plan.crop_x, plan.crop_y), (0, 76));
//!
//! let rgb = vec![0u8; input.area() * 3];
//! let mut resizer = fast_image_resize::Resizer::new();
//! let out = scale_and_crop(&mut resizer, SrcView::new(&rgb, input, 3, None)?, &plan, None)?;
//! assert_eq!(out.len(), 640 * 360 * 3);
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod plan;

pub use error::ScaleError;
pub use plan::{build_plan, compute_scale_factor, Axis, ScaleDecision, ScalePolicy, Size};
