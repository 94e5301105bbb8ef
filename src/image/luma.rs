//! Luma reduction for correlation.
//!
//! Luma here is the unweighted mean of R, G and B with alpha ignored, rounded
//! half away from zero. Luma inputs are copied through unchanged.

use crate::image::{PixelBuffer, PixelView, LUMA};
use crate::util::math::round_to_u8;

/// Reduces a view to a single-channel luma buffer of the same size.
pub fn to_luma(src: PixelView<'_>) -> PixelBuffer {
    if src.channels() == LUMA {
        return src.to_buffer();
    }

    let channels = src.channels();
    let data = src
        .as_slice()
        .chunks_exact(channels)
        .map(|px| {
            let sum = u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]);
            round_to_u8(f64::from(sum) / 3.0)
        })
        .collect();
    PixelBuffer::from_parts(data, src.width(), src.height(), LUMA)
}
