//! Absolute-difference scan over every relative displacement of two images.
//!
//! The probe is slid across the reference. Map cell `(i, j)` holds the probe
//! placed at displacement `(i - (wp - 1), j - (hp - 1))`, meaning probe pixel
//! `(u, v)` lands on reference pixel `(u + dx, v + dy)`. The map is
//! `(wr + wp) x (hr + hp)`; the last row and column never overlap.

use crate::image::PixelView;
use crate::util::{PixFilterError, PixFilterResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Sum of absolute differences over one overlap rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Cell {
    pub(crate) sad: u64,
    pub(crate) area: usize,
}

impl Cell {
    /// Mean absolute difference over the overlap.
    pub(crate) fn normalized(&self) -> PixFilterResult<f64> {
        let value = self.sad as f64 / self.area as f64;
        if !value.is_finite() {
            return Err(PixFilterError::InternalSizeMismatch {
                context: "correlation overlap area",
                expected: 1,
                got: self.area,
            });
        }
        Ok(value)
    }
}

/// Row-major grid of overlap cells; `None` where the images do not touch.
pub(crate) struct CostGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) cells: Vec<Option<Cell>>,
}

impl CostGrid {
    pub(crate) fn get(&self, i: usize, j: usize) -> Option<Cell> {
        self.cells[j * self.width + i]
    }
}

/// Half-open overlap range along one axis for displacement `d`.
#[inline]
fn overlap_range(d: i64, ref_len: usize, probe_len: usize) -> Option<(usize, usize)> {
    let start = d.max(0);
    let end = (d + probe_len as i64).min(ref_len as i64);
    if start >= end {
        return None;
    }
    Some((start as usize, end as usize))
}

fn score_cell(reference: PixelView<'_>, probe: PixelView<'_>, dx: i64, dy: i64) -> Option<Cell> {
    let (x0, x1) = overlap_range(dx, reference.width(), probe.width())?;
    let (y0, y1) = overlap_range(dy, reference.height(), probe.height())?;

    let ref_data = reference.as_slice();
    let probe_data = probe.as_slice();
    let mut sad = 0u64;
    for y in y0..y1 {
        let ref_row = &ref_data[y * reference.width()..][x0..x1];
        let py = (y as i64 - dy) as usize;
        let px0 = (x0 as i64 - dx) as usize;
        let probe_row = &probe_data[py * probe.width()..][px0..px0 + (x1 - x0)];
        sad += ref_row
            .iter()
            .zip(probe_row)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum::<u64>();
    }
    Some(Cell {
        sad,
        area: (x1 - x0) * (y1 - y0),
    })
}

fn scan_row(
    reference: PixelView<'_>,
    probe: PixelView<'_>,
    width: usize,
    j: usize,
) -> Vec<Option<Cell>> {
    let dy = j as i64 - (probe.height() as i64 - 1);
    (0..width)
        .map(|i| {
            let dx = i as i64 - (probe.width() as i64 - 1);
            score_cell(reference, probe, dx, dy)
        })
        .collect()
}

/// Scores every displacement of the luma `probe` over the luma `reference`.
pub(crate) fn scan_displacements(
    reference: PixelView<'_>,
    probe: PixelView<'_>,
    parallel: bool,
) -> CostGrid {
    let width = reference.width() + probe.width();
    let height = reference.height() + probe.height();

    let rows = if parallel {
        scan_rows_par(reference, probe, width, height)
    } else {
        scan_rows_seq(reference, probe, width, height)
    };

    CostGrid {
        width,
        height,
        cells: rows.into_iter().flatten().collect(),
    }
}

fn scan_rows_seq(
    reference: PixelView<'_>,
    probe: PixelView<'_>,
    width: usize,
    height: usize,
) -> Vec<Vec<Option<Cell>>> {
    (0..height)
        .map(|j| scan_row(reference, probe, width, j))
        .collect()
}

#[cfg(feature = "rayon")]
fn scan_rows_par(
    reference: PixelView<'_>,
    probe: PixelView<'_>,
    width: usize,
    height: usize,
) -> Vec<Vec<Option<Cell>>> {
    (0..height)
        .into_par_iter()
        .map(|j| scan_row(reference, probe, width, j))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn scan_rows_par(
    reference: PixelView<'_>,
    probe: PixelView<'_>,
    width: usize,
    height: usize,
) -> Vec<Vec<Option<Cell>>> {
    scan_rows_seq(reference, probe, width, height)
}
