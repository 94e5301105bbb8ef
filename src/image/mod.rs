//! Pixel buffers and borrowed views.
//!
//! Pixels are stored row-major with channels interleaved. Two layouts are
//! supported: 4-channel RGBA and 1-channel luma. `PixelView` is a zero-copy
//! borrowed view used as filter input; `PixelBuffer` owns its storage and is
//! what every filter returns.

use crate::util::{PixFilterError, PixFilterResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod luma;

/// Channel count of an RGBA buffer.
pub const RGBA: usize = 4;
/// Channel count of a luma buffer.
pub const LUMA: usize = 1;

/// Index of the alpha channel in an RGBA pixel.
pub(crate) const ALPHA_INDEX: usize = 3;

/// Borrowed view into an interleaved pixel array.
#[derive(Copy, Clone, Debug)]
pub struct PixelView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> PixelView<'a> {
    /// Creates a view over an RGBA buffer.
    pub fn rgba(data: &'a [u8], width: usize, height: usize) -> PixFilterResult<Self> {
        Self::new(data, width, height, RGBA)
    }

    /// Creates a view over a single-channel luma buffer.
    pub fn luma(data: &'a [u8], width: usize, height: usize) -> PixFilterResult<Self> {
        Self::new(data, width, height, LUMA)
    }

    /// Creates a view with an explicit channel count (1 or 4).
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> PixFilterResult<Self> {
        let needed = required_len(width, height, channels)?;
        if data.len() != needed {
            return Err(PixFilterError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns true for 4-channel buffers.
    pub fn has_alpha(&self) -> bool {
        self.channels == RGBA
    }

    /// Number of channels that carry color (alpha excluded).
    pub fn color_channels(&self) -> usize {
        if self.has_alpha() {
            3
        } else {
            self.channels
        }
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Number of elements in one row.
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Returns the channels of the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Returns the interleaved elements of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.row_len();
        self.data.get(start..start + self.row_len())
    }

    /// Copies the view into an owned buffer.
    pub fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            data: self.data.to_vec(),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}

/// Owned interleaved pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl PixelBuffer {
    /// Wraps an existing vector after validating its shape.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> PixFilterResult<Self> {
        PixelView::new(&data, width, height, channels)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Wraps an RGBA vector.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> PixFilterResult<Self> {
        Self::new(data, width, height, RGBA)
    }

    /// Allocates a zero-filled buffer with the given shape.
    pub fn zeroed(width: usize, height: usize, channels: usize) -> PixFilterResult<Self> {
        let len = required_len(width, height, channels)?;
        Ok(Self {
            data: vec![0u8; len],
            width,
            height,
            channels,
        })
    }

    /// Fills a buffer with one repeated pixel value.
    pub fn filled(width: usize, height: usize, pixel: &[u8]) -> PixFilterResult<Self> {
        let channels = pixel.len();
        let len = required_len(width, height, channels)?;
        let data = pixel.iter().copied().cycle().take(len).collect();
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Assembles a buffer whose shape has already been checked by the caller.
    pub(crate) fn from_parts(data: Vec<u8>, width: usize, height: usize, channels: usize) -> Self {
        debug_assert_eq!(data.len(), width * height * channels);
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Returns a borrowed view of the buffer.
    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel data mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the channels of the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Consumes the buffer and returns the pixel vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

fn required_len(width: usize, height: usize, channels: usize) -> PixFilterResult<usize> {
    if width == 0 || height == 0 {
        return Err(PixFilterError::InvalidDimensions { width, height });
    }
    if channels != RGBA && channels != LUMA {
        return Err(PixFilterError::UnsupportedChannels { channels });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or(PixFilterError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{PixelBuffer, PixelView};
    use crate::util::PixFilterError;

    #[test]
    fn view_reads_pixels_and_rows() {
        let data: Vec<u8> = (0u8..24).collect();
        let view = PixelView::rgba(&data, 3, 2).unwrap();
        assert_eq!(view.pixel(1, 0).unwrap(), &[4, 5, 6, 7]);
        assert_eq!(view.pixel(2, 1).unwrap(), &[20, 21, 22, 23]);
        assert!(view.pixel(3, 0).is_none());
        assert_eq!(view.row(1).unwrap().len(), 12);
        assert_eq!(view.color_channels(), 3);
    }

    #[test]
    fn filled_repeats_pixel() {
        let buf = PixelBuffer::filled(2, 2, &[1, 2, 3, 4]).unwrap();
        assert_eq!(buf.data(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn filled_rejects_three_channels() {
        let err = PixelBuffer::filled(2, 2, &[1, 2, 3]).unwrap_err();
        assert_eq!(err, PixFilterError::UnsupportedChannels { channels: 3 });
    }

    #[test]
    fn zeroed_buffer_is_writable() {
        let mut buf = PixelBuffer::zeroed(2, 1, 1).unwrap();
        assert_eq!(buf.data(), &[0, 0]);
        buf.data_mut()[1] = 9;
        assert_eq!(buf.pixel(1, 0), Some(&[9u8][..]));
        assert!(PixelBuffer::zeroed(0, 1, 4).is_err());
    }
}
