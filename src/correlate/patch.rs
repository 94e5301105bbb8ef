//! Patch tracking: locate a neighborhood of one image inside another.
//!
//! The probe is the clamp-padded window around a chosen center of the first
//! image. Every pixel of the second image is scored by the mean absolute
//! difference between the probe and that pixel's own clamp-padded window.

use crate::image::PixelView;
use crate::util::math::window_shape;
use crate::util::PixFilterResult;
use crate::window::{extract_window, extract_window_into};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-pixel mean absolute difference of `target` windows against the
/// probe window cut from `source` at `(cx, cy)`. Both views are luma.
pub(crate) fn patch_costs(
    source: PixelView<'_>,
    cx: i64,
    cy: i64,
    radius: usize,
    target: PixelView<'_>,
    parallel: bool,
) -> PixFilterResult<Vec<Option<f64>>> {
    let (_, area) = window_shape(radius, 1)?;
    let count = area as f64;
    let probe = extract_window(source, cx, cy, radius)?;
    let probe = probe.data();

    let score_row = |y: usize, scratch: &mut Vec<u8>| -> PixFilterResult<Vec<Option<f64>>> {
        let mut row = Vec::with_capacity(target.width());
        for x in 0..target.width() {
            extract_window_into(target, x as i64, y as i64, radius, scratch)?;
            let sad: u64 = probe
                .iter()
                .zip(scratch.iter())
                .map(|(&a, &b)| u64::from(a.abs_diff(b)))
                .sum();
            row.push(Some(sad as f64 / count));
        }
        Ok(row)
    };

    let rows = if parallel {
        score_rows_par(target.height(), &score_row)?
    } else {
        let mut scratch = Vec::new();
        (0..target.height())
            .map(|y| score_row(y, &mut scratch))
            .collect::<PixFilterResult<Vec<_>>>()?
    };
    Ok(rows.into_iter().flatten().collect())
}

#[cfg(feature = "rayon")]
fn score_rows_par<F>(height: usize, score_row: &F) -> PixFilterResult<Vec<Vec<Option<f64>>>>
where
    F: Fn(usize, &mut Vec<u8>) -> PixFilterResult<Vec<Option<f64>>> + Sync,
{
    (0..height)
        .into_par_iter()
        .map_init(Vec::new, |scratch, y| score_row(y, scratch))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn score_rows_par<F>(height: usize, score_row: &F) -> PixFilterResult<Vec<Vec<Option<f64>>>>
where
    F: Fn(usize, &mut Vec<u8>) -> PixFilterResult<Vec<Option<f64>>> + Sync,
{
    let mut scratch = Vec::new();
    (0..height).map(|y| score_row(y, &mut scratch)).collect()
}
