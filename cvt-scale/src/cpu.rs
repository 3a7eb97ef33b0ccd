// SPDX-License-Identifier: MIT
// CPU resample + center crop built on fast_image_resize (SIMD-accelerated).
// Interleaved u8 pixels (1-4 channels) in, tightly packed pixels of the same layout out.

use fast_image_resize as fir;
use fir::images::{Image, ImageRef};
use fir::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

use crate::error::ScaleError;
use crate::plan::{CropRect, Interpolation, ScaleDecision, Size};

/// Pre-allocated scratch to compact strided input to tightly packed rows (only if needed).
pub struct Staging {
    pub(crate) buf: Vec<u8>,
}
impl Staging {
    pub fn with_capacity(cap: usize) -> Self { Self { buf: Vec::with_capacity(cap) } }
    pub fn ensure_len(&mut self, len: usize) { if self.buf.len() < len { self.buf.resize(len, 0); } }
    pub fn as_slice(&self) -> &[u8] { &self.buf }
}

/// Borrowed source pixels with an optional row pitch.
#[derive(Clone, Copy, Debug)]
pub struct SrcView<'a> {
    pub data: &'a [u8],
    pub size: Size,
    pub channels: u8,
    pub stride: usize,
}

impl<'a> SrcView<'a> {
    /// `stride` is bytes per row; `None` means tightly packed.
    pub fn new(data: &'a [u8], size: Size, channels: u8, stride: Option<usize>) -> Result<Self, ScaleError> {
        pixel_type(channels)?;
        let row_bytes = size.w as usize * channels as usize;
        let stride = stride.unwrap_or(row_bytes);
        if stride < row_bytes {
            return Err(ScaleError::StrideTooSmall { stride, row_bytes });
        }
        let needed = match size.h as usize {
            0 => 0,
            h => stride * (h - 1) + row_bytes,
        };
        if data.len() < needed {
            return Err(ScaleError::BufferTooSmall { expected: needed, actual: data.len() });
        }
        Ok(Self { data, size, channels, stride })
    }

    pub fn row_bytes(&self) -> usize {
        self.size.w as usize * self.channels as usize
    }

    pub fn is_tight(&self) -> bool {
        self.stride == self.row_bytes()
    }

    fn tight_len(&self) -> usize {
        self.row_bytes() * self.size.h as usize
    }
}

/// Map an interleaved channel count onto the resizer's pixel type.
pub fn pixel_type(channels: u8) -> Result<PixelType, ScaleError> {
    match channels {
        1 => Ok(PixelType::U8),
        2 => Ok(PixelType::U8x2),
        3 => Ok(PixelType::U8x3),
        4 => Ok(PixelType::U8x4),
        c => Err(ScaleError::UnsupportedChannels(c)),
    }
}

fn resize_alg(interpolation: Interpolation) -> ResizeAlg {
    match interpolation {
        // Box convolution averages every covered source pixel when shrinking.
        Interpolation::Area => ResizeAlg::Convolution(FilterType::Box),
        Interpolation::Cubic => ResizeAlg::Convolution(FilterType::CatmullRom),
    }
}

/// Resample `src` to `dst` with the given filter. Returns a tightly packed buffer.
pub fn resample(
    resizer: &mut Resizer,
    src: SrcView<'_>,
    dst: Size,
    interpolation: Interpolation,
    mut staging: Option<&mut Staging>,
) -> Result<Vec<u8>, ScaleError> {
    let pixel_type = pixel_type(src.channels)?;

    // --- Build source view (tightly packed) ---
    let len = src.tight_len();
    let tight: &[u8] = if src.is_tight() {
        &src.data[..len]
    } else {
        let st = staging.as_deref_mut().ok_or(ScaleError::StrideMismatchAndNoStaging)?;
        st.ensure_len(len);
        compact_rows(src.data, src.stride, &mut st.buf[..len], src.row_bytes(), src.size.h as usize);
        &st.buf[..len]
    };
    let src_image = ImageRef::new(src.size.w, src.size.h, tight, pixel_type)?;

    // --- Resize ---
    let mut dst_image = Image::new(dst.w, dst.h, pixel_type);
    let opts = ResizeOptions::new()
        .resize_alg(resize_alg(interpolation))
        .use_alpha(false);
    resizer.resize(&src_image, &mut dst_image, &opts)?;

    Ok(dst_image.into_vec())
}

/// Copy `rect` out of `src` into a new tightly packed buffer.
pub fn crop(src: SrcView<'_>, rect: CropRect) -> Result<Vec<u8>, ScaleError> {
    if !rect.within(src.size) {
        return Err(ScaleError::CropOutOfBounds {
            scaled: src.size,
            output: Size::new(rect.w, rect.h),
            crop_x: rect.x as i64,
            crop_y: rect.y as i64,
        });
    }
    let bpp = src.channels as usize;
    let row_bytes = rect.w as usize * bpp;
    let mut out = Vec::with_capacity(row_bytes * rect.h as usize);
    for r in 0..rect.h as usize {
        let off = (rect.y as usize + r) * src.stride + rect.x as usize * bpp;
        out.extend_from_slice(&src.data[off..off + row_bytes]);
    }
    Ok(out)
}

/// Apply a full [`ScaleDecision`]: resample to `decision.scaled`, then center-crop to
/// `decision.output`.
///
/// The crop rectangle is validated before any pixel work, so an unfittable plan fails with
/// [`ScaleError::CropOutOfBounds`] without resampling.
pub fn scale_and_crop(
    resizer: &mut Resizer,
    src: SrcView<'_>,
    decision: &ScaleDecision,
    staging: Option<&mut Staging>,
) -> Result<Vec<u8>, ScaleError> {
    if src.size != decision.input {
        return Err(ScaleError::SizeMismatch { expected: decision.input, actual: src.size });
    }
    let rect = decision.crop_rect()?;

    match (decision.interpolation, decision.needs_crop()) {
        (None, false) => {
            let mut out = vec![0u8; src.tight_len()];
            compact_rows(src.data, src.stride, &mut out, src.row_bytes(), src.size.h as usize);
            Ok(out)
        }
        (None, true) => crop(src, rect),
        (Some(interp), false) => resample(resizer, src, decision.scaled, interp, staging),
        (Some(interp), true) => {
            let scaled = resample(resizer, src, decision.scaled, interp, staging)?;
            let view = SrcView::new(&scaled, decision.scaled, src.channels, None)?;
            crop(view, rect)
        }
    }
}

#[inline]
fn compact_rows(src: &[u8], src_pitch: usize, dst: &mut [u8], row_bytes: usize, rows: usize) {
    for r in 0..rows {
        let s = &src[r * src_pitch .. r * src_pitch + row_bytes];
        let d = &mut dst[r * row_bytes .. (r + 1) * row_bytes];
        d.copy_from_slice(s);
    }
}
