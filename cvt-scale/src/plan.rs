// SPDX-License-Identifier: MIT
//! # Scale Selection and Crop Planning
//!
//! This module decides how a frame of one fixed size becomes a frame of another fixed size.
//! A single factor scales both axes (aspect ratio is preserved), then the excess is cut away
//! symmetrically. Output is never padded.
//!
//! ## Selection Rule
//!
//! With `scale_x = out.w / in.w` and `scale_y = out.h / in.h`:
//!
//! | Case | [`ScalePolicy::Gentle`] | [`ScalePolicy::Cover`] |
//! |------|-------------------------|------------------------|
//! | both `< 1.0` (shrink) | `max(scale_x, scale_y)` | `max(scale_x, scale_y)` |
//! | both `> 1.0` (grow) | `min(scale_x, scale_y)` | `max(scale_x, scale_y)` |
//! | mixed or either `== 1.0` | factor closest to `1.0`, x axis on ties | `max(scale_x, scale_y)` |
//!
//! `Gentle` may pick a factor that leaves one scaled side shorter than the output. The plan
//! still records it; [`ScaleDecision::crop_rect`] reports the problem as
//! [`ScaleError::CropOutOfBounds`]. `Cover` always produces a croppable intermediate.
//!
//! ## Rounding
//!
//! The chosen factor is always one axis ratio `out / in`, so scaled sides are computed as
//! `floor(side * out / in)` in integer arithmetic. This is the exact floor of the product; an
//! `f64` multiply can land a hair under the selected axis' output size and lose a pixel.
//! Crop offsets are `(scaled - output)` floor-divided by two, so the right/bottom margin may be
//! one pixel wider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScaleError;

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Reject zero-sized sides. `name` prefixes the field names in the error (`input` gives
    /// `input_width` / `input_height`).
    pub fn validate(self, name: &'static str) -> Result<Self, ScaleError> {
        let (wname, hname) = match name {
            "input" => ("input_width", "input_height"),
            "output" => ("output_width", "output_height"),
            _ => ("width", "height"),
        };
        if self.w == 0 {
            return Err(ScaleError::InvalidDimension { name: wname, value: self.w });
        }
        if self.h == 0 {
            return Err(ScaleError::InvalidDimension { name: hname, value: self.h });
        }
        Ok(self)
    }

    pub fn area(self) -> usize {
        self.w as usize * self.h as usize
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

impl FromStr for Size {
    type Err = ScaleError;

    /// Parse `1280x720` (an upper-case `X` is accepted too).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScaleError::InvalidSize(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let w = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let h = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Size { w, h })
    }
}

/// How the shared scale factor is chosen from the per-axis factors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScalePolicy {
    /// Shrink as little and grow as little as possible; mixed cases follow the axis closest to 1.0.
    #[default]
    Gentle,
    /// Always take the larger factor so both scaled sides cover the output (crop only).
    Cover,
}

/// Axis whose ratio became the shared scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Resampling filter, picked from the direction of the scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Area averaging, used when shrinking.
    Area,
    /// Cubic, used when enlarging.
    Cubic,
}

impl Interpolation {
    /// `None` for a factor of exactly 1.0: no resample is needed.
    pub fn for_scale(scale_factor: f64) -> Option<Self> {
        if scale_factor < 1.0 {
            Some(Interpolation::Area)
        } else if scale_factor > 1.0 {
            Some(Interpolation::Cubic)
        } else {
            None
        }
    }
}

/// Sub-rectangle of the scaled frame that becomes the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropRect {
    pub fn within(&self, size: Size) -> bool {
        self.x as u64 + self.w as u64 <= size.w as u64 && self.y as u64 + self.h as u64 <= size.h as u64
    }
}

/// Everything needed to turn an `input` frame into an `output` frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScaleDecision {
    pub input: Size,
    pub output: Size,
    pub policy: ScalePolicy,
    pub scale_x: f64,
    pub scale_y: f64,
    pub scale_factor: f64,
    pub axis: Axis,
    /// `floor(input * scale_factor)` per axis
    pub scaled: Size,
    /// Floor-divided centering offsets; negative when the scaled side is too short.
    pub crop_x: i64,
    pub crop_y: i64,
    pub interpolation: Option<Interpolation>,
}

impl ScaleDecision {
    pub fn needs_resample(&self) -> bool {
        self.interpolation.is_some()
    }

    pub fn needs_crop(&self) -> bool {
        self.scaled != self.output
    }

    /// True when the crop rectangle lies entirely inside the scaled frame.
    pub fn fits(&self) -> bool {
        self.crop_rect().is_ok()
    }

    /// The output rectangle inside the scaled frame.
    pub fn crop_rect(&self) -> Result<CropRect, ScaleError> {
        let out_of_bounds = || ScaleError::CropOutOfBounds {
            scaled: self.scaled,
            output: self.output,
            crop_x: self.crop_x,
            crop_y: self.crop_y,
        };
        if self.crop_x < 0 || self.crop_y < 0 {
            return Err(out_of_bounds());
        }
        let rect = CropRect {
            x: u32::try_from(self.crop_x).map_err(|_| out_of_bounds())?,
            y: u32::try_from(self.crop_y).map_err(|_| out_of_bounds())?,
            w: self.output.w,
            h: self.output.h,
        };
        if !rect.within(self.scaled) {
            return Err(out_of_bounds());
        }
        Ok(rect)
    }
}

/// Compute the shared scale factor with the default ([`ScalePolicy::Gentle`]) rule.
///
/// Fails with [`ScaleError::InvalidDimension`] if any side is zero.
pub fn compute_scale_factor(input: Size, output: Size) -> Result<f64, ScaleError> {
    let (scale_x, scale_y) = axis_scales(input, output)?;
    Ok(select_scale(scale_x, scale_y, ScalePolicy::Gentle))
}

/// Compute a complete plan for converting `input` frames into `output` frames.
///
/// O(1); no pixel work happens here. Fails with [`ScaleError::ScaledTooLarge`] when a scaled
/// side would exceed `u32::MAX`. An unfittable plan is returned as-is; callers check
/// [`ScaleDecision::fits`] or hit the error from [`ScaleDecision::crop_rect`] at convert time.
pub fn build_plan(input: Size, output: Size, policy: ScalePolicy) -> Result<ScaleDecision, ScaleError> {
    let (scale_x, scale_y) = axis_scales(input, output)?;
    let axis = select_axis(scale_x, scale_y, policy);
    let (scale_factor, num, den) = match axis {
        Axis::X => (scale_x, output.w, input.w),
        Axis::Y => (scale_y, output.h, input.h),
    };

    let checked = |side: u32| {
        scaled_side(side, num, den).ok_or(ScaleError::ScaledTooLarge {
            input,
            output,
            side: side as u64 * num as u64 / den as u64,
        })
    };
    let scaled = Size {
        w: checked(input.w)?,
        h: checked(input.h)?,
    };
    let crop_x = (scaled.w as i64 - output.w as i64).div_euclid(2);
    let crop_y = (scaled.h as i64 - output.h as i64).div_euclid(2);

    Ok(ScaleDecision {
        input,
        output,
        policy,
        scale_x,
        scale_y,
        scale_factor,
        axis,
        scaled,
        crop_x,
        crop_y,
        interpolation: Interpolation::for_scale(scale_factor),
    })
}

fn axis_scales(input: Size, output: Size) -> Result<(f64, f64), ScaleError> {
    let input = input.validate("input")?;
    let output = output.validate("output")?;
    Ok((
        output.w as f64 / input.w as f64,
        output.h as f64 / input.h as f64,
    ))
}

fn select_scale(scale_x: f64, scale_y: f64, policy: ScalePolicy) -> f64 {
    match select_axis(scale_x, scale_y, policy) {
        Axis::X => scale_x,
        Axis::Y => scale_y,
    }
}

fn select_axis(scale_x: f64, scale_y: f64, policy: ScalePolicy) -> Axis {
    let larger = if scale_x >= scale_y { Axis::X } else { Axis::Y };
    let smaller = if scale_x <= scale_y { Axis::X } else { Axis::Y };
    match policy {
        ScalePolicy::Cover => larger,
        ScalePolicy::Gentle => {
            if scale_x < 1.0 && scale_y < 1.0 {
                larger
            } else if scale_x > 1.0 && scale_y > 1.0 {
                smaller
            } else if (scale_x - 1.0).abs() <= (scale_y - 1.0).abs() {
                // tie goes to x
                Axis::X
            } else {
                Axis::Y
            }
        }
    }
}

/// `floor(side * num / den)` without going through floating point; `None` past `u32::MAX`.
fn scaled_side(side: u32, num: u32, den: u32) -> Option<u32> {
    u32::try_from(side as u64 * num as u64 / den as u64).ok()
}
