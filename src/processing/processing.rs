//! # Frame Conversion
//!
//! [`FrameConverter`] applies one [`ConversionConfig`] to any number of frames. The
//! [`ScaleDecision`] is computed once at construction; each [`FrameConverter::convert`] call
//! only checks the frame size, resamples and crops.
//!
//! ## Pipeline
//!
//! 1. **Check**: the frame must be exactly `input_width x input_height`
//! 2. **Scale**: resample to `floor(input * scale_factor)` with area averaging when shrinking
//!    and cubic interpolation when enlarging (skipped at a factor of exactly 1.0)
//! 3. **Crop**: cut the `output_width x output_height` rectangle centered in the scaled frame
//!
//! Frames that need no conversion are returned as-is, sharing their buffer.
//!
//! ## Concurrency
//!
//! `convert` takes `&self` and allocates its own resizer per call, so one converter can be
//! shared between threads (`Arc<FrameConverter>`) and used on independent frames in parallel.

use cvt_scale::ScaleDecision;
use cvt_scale::cpu::{Staging, scale_and_crop};
use fast_image_resize::Resizer;
use tracing::{info, trace, warn};

use crate::config::ConversionConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::frame::Frame;

/// Converts frames of the configured input size into frames of the configured output size.
#[derive(Debug, Clone)]
pub struct FrameConverter {
    config: ConversionConfig,
    decision: ScaleDecision,
}

impl FrameConverter {
    pub fn new(config: ConversionConfig) -> ConvertResult<Self> {
        let decision = config.decision()?;

        if config.needs_conversion() {
            info!(
                input = %config.input(),
                output = %config.output(),
                scale_x = decision.scale_x,
                scale_y = decision.scale_y,
                scale_factor = decision.scale_factor,
                scaled = %decision.scaled,
                crop_x = decision.crop_x,
                crop_y = decision.crop_y,
                "frame conversion configured"
            );
        } else {
            info!(size = %config.input(), "frames already have the output size, no conversion");
        }
        if !decision.fits() {
            warn!(
                policy = ?config.policy(),
                scaled = %decision.scaled,
                output = %config.output(),
                "scaled frame is smaller than the output; every convert will fail with a crop error"
            );
        }

        Ok(Self { config, decision })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn decision(&self) -> &ScaleDecision {
        &self.decision
    }

    pub fn needs_conversion(&self) -> bool {
        self.config.needs_conversion()
    }

    /// Convert one frame. The result has the output size, the input's channel count and its
    /// timestamp.
    pub fn convert(&self, frame: &Frame) -> ConvertResult<Frame> {
        if frame.size() != self.config.input() {
            return Err(ConvertError::dimension_mismatch(self.config.input(), frame.size())
                .with_operation("convert"));
        }
        if !self.needs_conversion() {
            return Ok(frame.clone());
        }

        let mut resizer = Resizer::new();
        let mut staging = (!frame.is_tight() && self.decision.needs_resample())
            .then(|| Staging::with_capacity(frame.size().area() * frame.channels() as usize));
        let data = scale_and_crop(&mut resizer, frame.view()?, &self.decision, staging.as_mut())
            .map_err(|e| ConvertError::from(e).with_operation("convert"))?;

        trace!(
            pts_ns = frame.pts_ns(),
            scaled = %self.decision.scaled,
            output = %self.config.output(),
            "frame converted"
        );
        Frame::from_parts(self.config.output(), frame.channels(), data, frame.pts_ns())
    }
}

/// Convert a single frame with a one-off converter.
pub fn convert(frame: &Frame, config: &ConversionConfig) -> ConvertResult<Frame> {
    FrameConverter::new(*config)?.convert(frame)
}
