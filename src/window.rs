//! Square neighborhood extraction with clamp-to-edge padding.
//!
//! A window of radius `r` around `(cx, cy)` always holds `(2r+1)^2` pixels in
//! row-major order. Coordinates that fall outside the image are clamped to the
//! nearest edge row/column independently per axis, so a corner replicates the
//! corner pixel in both directions.

use crate::image::{PixelBuffer, PixelView};
use crate::util::math::window_shape;
use crate::util::{PixFilterError, PixFilterResult};

/// Signed 2D coordinate or displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Horizontal component (columns).
    pub x: i64,
    /// Vertical component (rows).
    pub y: i64,
}

impl Offset {
    /// Creates an offset.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The zero displacement.
    pub const ZERO: Offset = Offset { x: 0, y: 0 };
}

/// Maps a possibly out-of-range coordinate onto `[0, dim)`.
#[inline]
pub fn source_index(wanted: i64, dim: usize) -> usize {
    let last = dim.saturating_sub(1) as i64;
    wanted.clamp(0, last) as usize
}

/// Extracts the window of `radius` around `(cx, cy)` as a new buffer.
///
/// The result has the same channel count as `src` and dimensions
/// `(2*radius+1) x (2*radius+1)`.
pub fn extract_window(
    src: PixelView<'_>,
    cx: i64,
    cy: i64,
    radius: usize,
) -> PixFilterResult<PixelBuffer> {
    let (side, len) = window_shape(radius, src.channels())?;
    let mut out = Vec::with_capacity(len);
    extract_window_into(src, cx, cy, radius, &mut out)?;
    Ok(PixelBuffer::from_parts(out, side, side, src.channels()))
}

/// Extracts the window of `radius` around `(cx, cy)` into `out`.
///
/// `out` is cleared first so a single scratch vector can be reused across
/// every pixel of a pass.
pub fn extract_window_into(
    src: PixelView<'_>,
    cx: i64,
    cy: i64,
    radius: usize,
    out: &mut Vec<u8>,
) -> PixFilterResult<()> {
    let channels = src.channels();
    let (_, expected) = window_shape(radius, channels)?;
    let r = radius as i64;
    let (x0, x1, y0, y1) = match (
        cx.checked_sub(r),
        cx.checked_add(r),
        cy.checked_sub(r),
        cy.checked_add(r),
    ) {
        (Some(x0), Some(x1), Some(y0), Some(y1)) => (x0, x1, y0, y1),
        _ => {
            return Err(PixFilterError::InvalidInput(
                "window center is out of coordinate range",
            ))
        }
    };
    let data = src.as_slice();
    let width = src.width();

    out.clear();
    for wy in y0..=y1 {
        let sy = source_index(wy, src.height());
        let row_base = sy * width;
        for wx in x0..=x1 {
            let sx = source_index(wx, width);
            let start = (row_base + sx) * channels;
            out.extend_from_slice(&data[start..start + channels]);
        }
    }

    if out.len() != expected {
        return Err(PixFilterError::InternalSizeMismatch {
            context: "window extraction",
            expected,
            got: out.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{extract_window, source_index};
    use crate::image::PixelView;

    #[test]
    fn source_index_clamps_both_sides() {
        assert_eq!(source_index(-3, 5), 0);
        assert_eq!(source_index(2, 5), 2);
        assert_eq!(source_index(9, 5), 4);
        assert_eq!(source_index(-1, 1), 0);
    }

    #[test]
    fn corner_window_replicates_edges() {
        // 3x2 luma image:
        // 1 2 3
        // 4 5 6
        let data = [1u8, 2, 3, 4, 5, 6];
        let view = PixelView::luma(&data, 3, 2).unwrap();
        let win = extract_window(view, 0, 0, 1).unwrap();
        assert_eq!(win.width(), 3);
        assert_eq!(win.data(), &[1, 1, 2, 1, 1, 2, 4, 4, 5]);

        let win = extract_window(view, 2, 1, 1).unwrap();
        assert_eq!(win.data(), &[2, 3, 3, 5, 6, 6, 5, 6, 6]);
    }

    #[test]
    fn interior_window_matches_source_order() {
        let data: Vec<u8> = (0u8..16).collect();
        let view = PixelView::luma(&data, 4, 4).unwrap();
        let win = extract_window(view, 1, 1, 1).unwrap();
        assert_eq!(win.data(), &[0, 1, 2, 4, 5, 6, 8, 9, 10]);
    }

    #[test]
    fn radius_zero_returns_center_pixel() {
        let data = [9u8, 8, 7, 6, 5, 4, 3, 2];
        let view = PixelView::rgba(&data, 2, 1).unwrap();
        let win = extract_window(view, 1, 0, 0).unwrap();
        assert_eq!(win.data(), &[5, 4, 3, 2]);
    }
}
