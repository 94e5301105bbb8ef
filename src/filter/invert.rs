//! Color inversion.

use crate::filter::{Execution, FilterDescriptor, FilterKernel, FilterParams};
use crate::image::{PixelBuffer, PixelView};
use crate::util::PixFilterResult;

/// Registry metadata for [`InvertColors`].
pub static INVERT_COLORS: FilterDescriptor = FilterDescriptor {
    id: "invertColors",
    name: "Invert Colors",
    params: &[],
};

/// Replaces every color channel `v` with `255 - v`; alpha is copied.
pub fn invert(src: PixelView<'_>) -> PixelBuffer {
    let channels = src.channels();
    let color = src.color_channels();
    let mut data = src.as_slice().to_vec();
    for px in data.chunks_exact_mut(channels) {
        for v in &mut px[..color] {
            *v = 255 - *v;
        }
    }
    PixelBuffer::from_parts(data, src.width(), src.height(), channels)
}

/// `invertColors` registry entry.
pub struct InvertColors;

impl FilterKernel for InvertColors {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &INVERT_COLORS
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        _params: &FilterParams,
        _exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        Ok(invert(src))
    }
}

#[cfg(test)]
mod tests {
    use super::invert;
    use crate::image::PixelView;

    #[test]
    fn inverts_color_and_keeps_alpha() {
        let data = [0u8, 100, 255, 17];
        let view = PixelView::rgba(&data, 1, 1).unwrap();
        assert_eq!(invert(view).data(), &[255, 155, 0, 17]);
    }

    #[test]
    fn luma_has_no_alpha_to_keep() {
        let data = [0u8, 200];
        let view = PixelView::luma(&data, 2, 1).unwrap();
        assert_eq!(invert(view).data(), &[255, 55]);
    }
}
