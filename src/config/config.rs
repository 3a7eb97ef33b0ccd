//! # Conversion Configuration
//!
//! [`ConversionConfig`] declares the fixed input size a frame source delivers and the fixed
//! output size callers want. It is validated once at construction and never changes
//! afterwards, so the derived [`ScaleDecision`] can be computed once and reused for every frame.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Constraint | Description |
//! |-----------|------|------------|-------------|
//! | `input_width`, `input_height` | `u32` | > 0 | size of every incoming frame |
//! | `output_width`, `output_height` | `u32` | > 0 | size of every converted frame |
//! | `input_fps`, `output_fps` | `Option<u32>` | > 0, equal when both set | frame rate is passed through, never converted |
//! | `policy` | [`ScalePolicy`] | `gentle` (default) or `cover` | scale factor selection |
//!
//! ## File Format
//!
//! Configuration files are TOML with a `[conversion]` table:
//!
//! ```toml
//! [conversion]
//! input_width = 1280
//! input_height = 1024
//! output_width = 640
//! output_height = 360
//! input_fps = 30
//! output_fps = 30
//! policy = "gentle"
//! ```
//!
//! Dimensions are parsed as signed integers so that `0` and negative values are reported as
//! [`ConvertError::InvalidDimension`] rather than as a TOML type error.
//!
//! ## Examples
//!
//! ```rust
//! use frame_cvt::config::ConversionConfig;
//!
//! let config = ConversionConfig::new(1280, 1024, 640, 360).unwrap();
//! assert!(config.needs_conversion());
//!
//! let decision = config.decision().unwrap();
//! assert_eq!(decision.scale_factor, 0.5);
//!
//! assert!(ConversionConfig::new(0, 1024, 640, 360).is_err());
//! ```

use std::path::Path;

use cvt_scale::{ScaleDecision, ScalePolicy, Size, build_plan};
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// Immutable, validated conversion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionConfig {
    input: Size,
    output: Size,
    input_fps: Option<u32>,
    output_fps: Option<u32>,
    policy: ScalePolicy,
}

impl ConversionConfig {
    /// Creates a configuration with the default [`ScalePolicy::Gentle`] policy.
    ///
    /// Fails with [`ConvertError::InvalidDimension`] if any dimension is zero.
    pub fn new(
        input_width: u32,
        input_height: u32,
        output_width: u32,
        output_height: u32,
    ) -> ConvertResult<Self> {
        let input = Size::new(input_width, input_height).validate("input")?;
        let output = Size::new(output_width, output_height).validate("output")?;
        Ok(Self {
            input,
            output,
            input_fps: None,
            output_fps: None,
            policy: ScalePolicy::default(),
        })
    }

    /// Creates a configuration from signed dimensions, rejecting zero and negative values.
    pub fn from_signed(
        input_width: i64,
        input_height: i64,
        output_width: i64,
        output_height: i64,
    ) -> ConvertResult<Self> {
        Self::new(
            dimension("input_width", input_width)?,
            dimension("input_height", input_height)?,
            dimension("output_width", output_width)?,
            dimension("output_height", output_height)?,
        )
    }

    /// Declare frame rates. Both must be positive and equal; frame rate conversion is not
    /// supported.
    pub fn with_fps(mut self, input_fps: Option<u32>, output_fps: Option<u32>) -> ConvertResult<Self> {
        for (field, fps) in [("input_fps", input_fps), ("output_fps", output_fps)] {
            if fps == Some(0) {
                return Err(ConvertError::config(field, "0", "frame rate must be positive"));
            }
        }
        if let (Some(i), Some(o)) = (input_fps, output_fps) {
            if i != o {
                return Err(ConvertError::config(
                    "output_fps",
                    o.to_string(),
                    format!("must match input_fps ({i}); frame rate conversion is not supported"),
                ));
            }
        }
        self.input_fps = input_fps;
        self.output_fps = output_fps;
        Ok(self)
    }

    pub fn with_policy(mut self, policy: ScalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn input(&self) -> Size {
        self.input
    }

    pub fn output(&self) -> Size {
        self.output
    }

    pub fn input_width(&self) -> u32 {
        self.input.w
    }

    pub fn input_height(&self) -> u32 {
        self.input.h
    }

    pub fn output_width(&self) -> u32 {
        self.output.w
    }

    pub fn output_height(&self) -> u32 {
        self.output.h
    }

    pub fn input_fps(&self) -> Option<u32> {
        self.input_fps
    }

    pub fn output_fps(&self) -> Option<u32> {
        self.output_fps
    }

    pub fn policy(&self) -> ScalePolicy {
        self.policy
    }

    /// False when frames already have the output size, so they pass through untouched. Frame
    /// rates never differ once validated by [`Self::with_fps`].
    pub fn needs_conversion(&self) -> bool {
        self.input != self.output
    }

    /// Derive the scale factor, scaled size and crop offsets for this configuration.
    pub fn decision(&self) -> ConvertResult<ScaleDecision> {
        Ok(build_plan(self.input, self.output, self.policy)?)
    }

    /// Parse a TOML document with a `[conversion]` table.
    pub fn from_toml_str(s: &str) -> ConvertResult<Self> {
        let file: ConfigFile = toml::from_str(s)?;
        file.conversion.try_into()
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::io("read_config", e).with_path(path.display().to_string()))?;
        Self::from_toml_str(&text).map_err(|e| e.with_context(format!("loading {}", path.display())))
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    conversion: RawConversion,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConversion {
    input_width: i64,
    input_height: i64,
    output_width: i64,
    output_height: i64,
    input_fps: Option<i64>,
    output_fps: Option<i64>,
    #[serde(default)]
    policy: ScalePolicy,
}

impl TryFrom<RawConversion> for ConversionConfig {
    type Error = ConvertError;

    fn try_from(raw: RawConversion) -> ConvertResult<Self> {
        let fps = |field: &str, v: Option<i64>| -> ConvertResult<Option<u32>> {
            v.map(|v| {
                u32::try_from(v)
                    .map_err(|_| ConvertError::config(field, v.to_string(), "frame rate must be positive"))
            })
            .transpose()
        };
        Self::from_signed(raw.input_width, raw.input_height, raw.output_width, raw.output_height)?
            .with_fps(fps("input_fps", raw.input_fps)?, fps("output_fps", raw.output_fps)?)
            .map(|c| c.with_policy(raw.policy))
    }
}

fn dimension(field: &str, value: i64) -> ConvertResult<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConvertError::invalid_dimension(field, value)),
    }
}
