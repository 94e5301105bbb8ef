//! Best-offset selection and similarity-map rendering.

use crate::image::{PixelBuffer, LUMA};
use crate::util::math::round_to_u8;
use std::ops::RangeInclusive;

/// Winning map cells and the cost they share.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Selection {
    pub(crate) best_value: f64,
    pub(crate) cells: Vec<(usize, usize)>,
    pub(crate) center_value: Option<f64>,
}

/// Minimum-cost cells inside the given map window, exact ties kept.
///
/// Cells are visited row-major; the first minimum sets the best value, a
/// strictly lower cost resets the tie list, an equal cost is appended.
pub(crate) fn select_exact(
    costs: &[Option<f64>],
    width: usize,
    cols: RangeInclusive<usize>,
    rows: RangeInclusive<usize>,
) -> Option<Selection> {
    let mut best: Option<f64> = None;
    let mut cells = Vec::new();
    for j in rows {
        for i in cols.clone() {
            let Some(cost) = costs[j * width + i] else {
                continue;
            };
            match best {
                Some(b) if cost > b => {}
                Some(b) if cost == b => cells.push((i, j)),
                _ => {
                    best = Some(cost);
                    cells.clear();
                    cells.push((i, j));
                }
            }
        }
    }
    best.map(|best_value| Selection {
        best_value,
        cells,
        center_value: None,
    })
}

/// Best non-trivial cells for auto-correlation.
///
/// The center cell is excluded from the search and appended last. A cell is
/// a tie when `cost - best <= tolerance * best`.
pub(crate) fn select_auto(
    costs: &[Option<f64>],
    width: usize,
    center: (usize, usize),
    tolerance: f64,
) -> Option<Selection> {
    let center_value = costs[center.1 * width + center.0]?;
    let is_center = |idx: usize| idx == center.1 * width + center.0;

    let best = costs
        .iter()
        .enumerate()
        .filter(|&(idx, _)| !is_center(idx))
        .filter_map(|(_, cost)| *cost)
        .min_by(f64::total_cmp);

    let Some(best_value) = best else {
        return Some(Selection {
            best_value: center_value,
            cells: vec![center],
            center_value: Some(center_value),
        });
    };

    let limit = best_value + tolerance * best_value;
    let mut cells: Vec<(usize, usize)> = costs
        .iter()
        .enumerate()
        .filter(|&(idx, cost)| !is_center(idx) && cost.is_some_and(|c| c <= limit))
        .map(|(idx, _)| (idx % width, idx / width))
        .collect();
    cells.push(center);

    Some(Selection {
        best_value,
        cells,
        center_value: Some(center_value),
    })
}

/// Renders costs as `255 - 255 * cost / max_cost`; unscored cells are 0.
pub(crate) fn render_similarity(
    costs: &[Option<f64>],
    width: usize,
    height: usize,
) -> PixelBuffer {
    let max_cost = costs.iter().flatten().copied().fold(0.0f64, f64::max);
    let data = costs
        .iter()
        .map(|cost| match cost {
            None => 0,
            Some(_) if max_cost <= 0.0 => 255,
            Some(c) => 255 - round_to_u8(255.0 * c / max_cost),
        })
        .collect();
    PixelBuffer::from_parts(data, width, height, LUMA)
}
