//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{PixelBuffer, PixelView, LUMA, RGBA};
use crate::util::{PixFilterError, PixFilterResult};
use std::path::Path;

/// Creates a borrowed RGBA view from an `image` RGBA buffer.
pub fn view_from_rgba_image(img: &image::RgbaImage) -> PixFilterResult<PixelView<'_>> {
    PixelView::rgba(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts any decoded image into an owned RGBA buffer.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> PixFilterResult<PixelBuffer> {
    let rgba = img.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    PixelBuffer::from_rgba(rgba.into_raw(), width, height)
}

/// Loads an image from disk as RGBA.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> PixFilterResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| PixFilterError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}

/// Writes a buffer to disk; the format follows the file extension.
///
/// RGBA buffers are written as RGBA8, luma buffers as L8.
pub fn save_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> PixFilterResult<()> {
    let width = u32::try_from(buffer.width()).map_err(|_| PixFilterError::InvalidDimensions {
        width: buffer.width(),
        height: buffer.height(),
    })?;
    let height = u32::try_from(buffer.height()).map_err(|_| PixFilterError::InvalidDimensions {
        width: buffer.width(),
        height: buffer.height(),
    })?;
    let color = match buffer.channels() {
        RGBA => image::ExtendedColorType::Rgba8,
        LUMA => image::ExtendedColorType::L8,
        channels => return Err(PixFilterError::UnsupportedChannels { channels }),
    };
    image::save_buffer(path, buffer.data(), width, height, color).map_err(|err| {
        PixFilterError::ImageIo {
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{buffer_from_dynamic_image, view_from_rgba_image};

    #[test]
    fn rgba_image_converts_without_copy_or_loss() {
        let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8, y as u8, 7, 200]));
        let view = view_from_rgba_image(&img).unwrap();
        assert_eq!(view.pixel(2, 1), Some(&[2u8, 1, 7, 200][..]));

        let luma = image::GrayImage::from_pixel(2, 2, image::Luma([9]));
        let gray = image::DynamicImage::ImageLuma8(luma);
        let buffer = buffer_from_dynamic_image(&gray).unwrap();
        assert_eq!(buffer.channels(), 4);
        assert_eq!(buffer.pixel(1, 1), Some(&[9u8, 9, 9, 255][..]));
    }
}
