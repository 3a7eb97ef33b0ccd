//! # Frames
//!
//! An immutable, reference-counted grid of interleaved 8-bit pixels. Cloning a [`Frame`]
//! shares the buffer; conversion always produces a new frame.

use std::sync::Arc;

use cvt_scale::Size;
use cvt_scale::cpu::{SrcView, pixel_type};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::error::{ConvertError, ConvertResult};

/// Interleaved u8 frame with 1-4 channels.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
    pts_ns: Option<u64>,
}

impl Frame {
    /// Wrap a tightly packed buffer of `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> ConvertResult<Self> {
        let stride = width as usize * channels as usize;
        Self::with_stride(width, height, channels, stride, data)
    }

    /// Wrap a buffer whose rows are `stride` bytes apart (row padding allowed).
    pub fn with_stride(
        width: u32,
        height: u32,
        channels: u8,
        stride: usize,
        data: Vec<u8>,
    ) -> ConvertResult<Self> {
        pixel_type(channels)?;
        SrcView::new(&data, Size::new(width, height), channels, Some(stride))?;
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            channels,
            stride,
            pts_ns: None,
        })
    }

    /// Solid-color frame; `pixel.len()` is the channel count.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> ConvertResult<Self> {
        let channels = u8::try_from(pixel.len()).map_err(|_| ConvertError::unsupported_channels(pixel.len()))?;
        let data = pixel.repeat(width as usize * height as usize);
        Self::new(width, height, channels, data)
    }

    /// Attach a presentation timestamp (nanoseconds).
    pub fn with_pts(mut self, pts_ns: u64) -> Self {
        self.pts_ns = Some(pts_ns);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pts_ns(&self) -> Option<u64> {
        self.pts_ns
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_tight(&self) -> bool {
        self.stride == self.width as usize * self.channels as usize
    }

    /// True if both frames share one pixel buffer.
    pub fn shares_buffer(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// The samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside {}", self.size());
        let c = self.channels as usize;
        let off = y as usize * self.stride + x as usize * c;
        &self.data[off..off + c]
    }

    /// Tightly packed rows, copied only when the frame is strided.
    pub fn to_tight_vec(&self) -> Vec<u8> {
        if self.is_tight() {
            return self.data[..self.tight_len()].to_vec();
        }
        let row = self.width as usize * self.channels as usize;
        let mut out = Vec::with_capacity(self.tight_len());
        for r in 0..self.height as usize {
            out.extend_from_slice(&self.data[r * self.stride..r * self.stride + row]);
        }
        out
    }

    pub(crate) fn view(&self) -> ConvertResult<SrcView<'_>> {
        Ok(SrcView::new(&self.data, self.size(), self.channels, Some(self.stride))?)
    }

    pub(crate) fn from_parts(size: Size, channels: u8, data: Vec<u8>, pts_ns: Option<u64>) -> ConvertResult<Self> {
        let frame = Self::new(size.w, size.h, channels, data)?;
        Ok(Self { pts_ns, ..frame })
    }

    fn tight_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Build a frame from a decoded image, keeping gray/alpha layouts and widening everything
    /// else to 8-bit RGB or RGBA.
    pub fn from_image(image: DynamicImage) -> ConvertResult<Self> {
        let (w, h) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => Self::new(w, h, 1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => Self::new(w, h, 2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => Self::new(w, h, 3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => Self::new(w, h, 4, buf.into_raw()),
            other if other.color().has_alpha() => Self::new(w, h, 4, other.to_rgba8().into_raw()),
            other => Self::new(w, h, 3, other.to_rgb8().into_raw()),
        }
    }

    /// Copy into an `image` buffer for encoding.
    pub fn to_image(&self) -> ConvertResult<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let raw = self.to_tight_vec();
        let image = match self.channels {
            1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
            c => return Err(ConvertError::unsupported_channels(c)),
        };
        image.ok_or_else(|| ConvertError::invalid_frame("pixel buffer does not match frame size"))
    }
}

impl PartialEq for Frame {
    /// Frames are equal when size, layout and visible pixels match (row padding is ignored).
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self.channels == other.channels
            && self.to_tight_vec() == other.to_tight_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(Frame::new(4, 4, 3, vec![0; 48]).is_ok());
        assert!(matches!(
            Frame::new(4, 4, 3, vec![0; 47]),
            Err(ConvertError::InvalidFrame { .. })
        ));
        assert!(matches!(
            Frame::with_stride(4, 4, 3, 11, vec![0; 64]),
            Err(ConvertError::InvalidFrame { .. })
        ));
        assert!(matches!(
            Frame::filled(2, 2, &[0; 300]),
            Err(ConvertError::UnsupportedChannels { channels: 300, .. })
        ));
        assert!(matches!(
            Frame::new(4, 4, 7, vec![0; 112]),
            Err(ConvertError::UnsupportedChannels { channels: 7, .. })
        ));
    }

    #[test]
    fn test_strided_frame() {
        let data = vec![
            1, 2, 0, //
            3, 4, 0,
        ];
        let frame = Frame::with_stride(2, 2, 1, 3, data).unwrap();
        assert!(!frame.is_tight());
        assert_eq!(frame.pixel(1, 1), &[4]);
        assert_eq!(frame.to_tight_vec(), vec![1, 2, 3, 4]);
        assert_eq!(frame, Frame::new(2, 2, 1, vec![1, 2, 3, 4]).unwrap());
    }

    #[test]
    fn test_image_round_trip_keeps_layout() {
        let frame = Frame::filled(3, 2, &[9, 8, 7, 255]).unwrap().with_pts(42);
        let image = frame.to_image().unwrap();
        assert_eq!(image.color(), image::ColorType::Rgba8);
        let back = Frame::from_image(image).unwrap();
        assert_eq!(back, frame);
        assert_eq!(back.pts_ns(), None);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let frame = Frame::filled(2, 2, &[1, 2, 3]).unwrap();
        let copy = frame.clone();
        assert!(frame.shares_buffer(&copy));
    }
}
