//! Sobel gradient magnitude.

use crate::filter::exec::map_pixels;
use crate::filter::{Execution, FilterDescriptor, FilterKernel, FilterParams};
use crate::image::{PixelBuffer, PixelView, ALPHA_INDEX};
use crate::kernel::sobel::{gradient_at, magnitude};
use crate::trace::trace_span;
use crate::util::math::round_to_u8;
use crate::util::PixFilterResult;
use crate::window::extract_window_into;

/// Registry metadata for [`SobelOperator`].
pub static SOBEL_OPERATOR: FilterDescriptor = FilterDescriptor {
    id: "sobelOperator",
    name: "Sobel Operator",
    params: &[],
};

/// Per-channel gradient magnitude `sqrt(gx^2 + gy^2)` over a clamp-padded
/// 3x3 window, clamped to `[0, 255]`.
///
/// Alpha does not take part and is set to 255 in the output.
pub fn sobel(src: PixelView<'_>, exec: Execution) -> PixFilterResult<PixelBuffer> {
    let _span = trace_span!("sobel", width = src.width(), height = src.height()).entered();
    let channels = src.channels();
    let color = src.color_channels();
    let has_alpha = src.has_alpha();

    map_pixels(src, exec, |x, y, scratch, out| {
        extract_window_into(src, x as i64, y as i64, 1, &mut scratch.window)?;
        for (c, slot) in out.iter_mut().enumerate().take(color) {
            let (gx, gy) = gradient_at(&scratch.window, channels, c);
            *slot = round_to_u8(magnitude(gx, gy));
        }
        if has_alpha {
            out[ALPHA_INDEX] = 255;
        }
        Ok(())
    })
}

/// `sobelOperator` registry entry.
pub struct SobelOperator;

impl FilterKernel for SobelOperator {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &SOBEL_OPERATOR
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        _params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        sobel(src, exec)
    }
}
