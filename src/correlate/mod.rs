//! Correlation-based alignment of two images.
//!
//! Both inputs are reduced to luma, the smaller one (the probe) is slid over
//! every displacement of the larger one (the reference) and each overlap is
//! scored by the sum of absolute differences. Auto-correlation normalizes by
//! overlap area and reports the best non-trivial offsets plus the zero
//! offset; cross-correlation keeps raw sums and only considers displacements
//! where the probe lies fully inside the reference.
//!
//! Offsets are always reported as the displacement of image 2 relative to
//! image 1: pixel `(u, v)` of image 2 overlays pixel `(u + x, v + y)` of
//! image 1.

mod overlap;
mod patch;
mod select;

use crate::image::luma::to_luma;
use crate::image::{PixelBuffer, PixelView};
use crate::trace::{trace_event, trace_span};
use crate::util::{PixFilterError, PixFilterResult};
use crate::window::Offset;
use overlap::{scan_displacements, CostGrid};
use select::{render_similarity, select_auto, select_exact, Selection};

/// Which cost and selection rule a correlation run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrelationMode {
    /// Area-normalized costs; the trivial zero offset is reported separately.
    Auto,
    /// Raw costs over full-overlap displacements only.
    Cross,
    /// Tracks the window of `radius` around `(x, y)` in image 1 across every
    /// pixel of image 2.
    Patch { x: i64, y: i64, radius: usize },
}

/// Tuning knobs for [`CorrelationMatcher`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationConfig {
    /// Relative tolerance for auto-correlation ties.
    pub auto_tie_tolerance: f64,
    /// Scan displacement rows on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            auto_tie_tolerance: 0.7,
            parallel: false,
        }
    }
}

impl CorrelationConfig {
    /// Sets the auto-correlation tie tolerance.
    pub fn with_auto_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.auto_tie_tolerance = tolerance;
        self
    }

    /// Enables or disables parallel scanning.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> PixFilterResult<()> {
        if !self.auto_tie_tolerance.is_finite() || self.auto_tie_tolerance < 0.0 {
            return Err(PixFilterError::InvalidInput(
                "auto_tie_tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Outcome of a correlation run.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationResult {
    /// Single-channel diagnostic map; brighter means more similar.
    pub similarity_map: PixelBuffer,
    /// Cost shared by the reported offsets (lower is better).
    pub best_value: f64,
    /// Winning offsets in scan order. For auto-correlation the zero offset
    /// is always last.
    pub best_offsets: Vec<Offset>,
    /// Cost at the zero offset (auto-correlation only).
    pub center_value: Option<f64>,
    /// Whether image 2 served as the scan reference because it was larger.
    pub swapped: bool,
    /// Mode the result was computed with.
    pub mode: CorrelationMode,
    origin: Offset,
}

impl CorrelationResult {
    /// First reported offset.
    pub fn best(&self) -> Option<Offset> {
        self.best_offsets.first().copied()
    }

    /// Offset of image 2 relative to image 1 represented by map cell `(i, j)`.
    pub fn offset_at(&self, i: usize, j: usize) -> Offset {
        let dx = i as i64 - self.origin.x;
        let dy = j as i64 - self.origin.y;
        if self.swapped {
            Offset::new(-dx, -dy)
        } else {
            Offset::new(dx, dy)
        }
    }

    fn from_selection(
        selection: Selection,
        similarity_map: PixelBuffer,
        swapped: bool,
        mode: CorrelationMode,
        origin: Offset,
    ) -> Self {
        let mut result = Self {
            similarity_map,
            best_value: selection.best_value,
            best_offsets: Vec::with_capacity(selection.cells.len()),
            center_value: selection.center_value,
            swapped,
            mode,
            origin,
        };
        result.best_offsets = selection
            .cells
            .iter()
            .map(|&(i, j)| result.offset_at(i, j))
            .collect();
        result
    }
}

/// Finds the displacement(s) that best align two images.
#[derive(Clone, Debug, Default)]
pub struct CorrelationMatcher {
    config: CorrelationConfig,
}

impl CorrelationMatcher {
    /// Creates a matcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: CorrelationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Correlates `a` (image 1) with `b` (image 2) using `mode`.
    pub fn correlate(
        &self,
        a: PixelView<'_>,
        b: PixelView<'_>,
        mode: CorrelationMode,
    ) -> PixFilterResult<CorrelationResult> {
        self.config.validate()?;
        let _span = trace_span!(
            "correlate",
            mode = ?mode,
            w1 = a.width(),
            h1 = a.height(),
            w2 = b.width(),
            h2 = b.height()
        )
        .entered();

        let luma_a = to_luma(a);
        let luma_b = to_luma(b);
        let result = match mode {
            CorrelationMode::Auto | CorrelationMode::Cross => {
                self.correlate_luma(luma_a.view(), luma_b.view(), mode)?
            }
            CorrelationMode::Patch { x, y, radius } => {
                self.patch_luma(luma_a.view(), x, y, radius, luma_b.view())?
            }
        };
        trace_event!("correlation_ties", count = result.best_offsets.len());
        Ok(result)
    }

    /// Correlates an image with itself.
    pub fn auto_correlate(&self, a: PixelView<'_>) -> PixFilterResult<CorrelationResult> {
        self.correlate(a, a, CorrelationMode::Auto)
    }

    /// Locates the best full-overlap alignment of two distinct images.
    pub fn cross_correlate(
        &self,
        a: PixelView<'_>,
        b: PixelView<'_>,
    ) -> PixFilterResult<CorrelationResult> {
        self.correlate(a, b, CorrelationMode::Cross)
    }

    /// Tracks the neighborhood of `(cx, cy)` in `a` across every pixel of `b`.
    ///
    /// The map is `b.width() x b.height()`; offsets are `(x - cx, y - cy)`.
    pub fn match_patch(
        &self,
        a: PixelView<'_>,
        cx: i64,
        cy: i64,
        radius: usize,
        b: PixelView<'_>,
    ) -> PixFilterResult<CorrelationResult> {
        self.correlate(
            a,
            b,
            CorrelationMode::Patch {
                x: cx,
                y: cy,
                radius,
            },
        )
    }

    fn correlate_luma(
        &self,
        luma_a: PixelView<'_>,
        luma_b: PixelView<'_>,
        mode: CorrelationMode,
    ) -> PixFilterResult<CorrelationResult> {
        let swapped = luma_b.as_slice().len() > luma_a.as_slice().len();
        let (reference, probe) = if swapped {
            (luma_b, luma_a)
        } else {
            (luma_a, luma_b)
        };
        let (wr, hr) = (reference.width(), reference.height());
        let (wp, hp) = (probe.width(), probe.height());
        if mode == CorrelationMode::Cross && (wp > wr || hp > hr) {
            return Err(PixFilterError::InvalidInput(
                "cross-correlation needs the smaller image to fit inside the larger",
            ));
        }

        let grid = scan_displacements(reference, probe, self.config.parallel);
        let costs = grid_costs(&grid, mode)?;
        let similarity_map = render_similarity(&costs, grid.width, grid.height);
        let center = (wp - 1, hp - 1);

        let selection = match mode {
            CorrelationMode::Auto => {
                select_auto(&costs, grid.width, center, self.config.auto_tie_tolerance)
            }
            _ => select_exact(&costs, grid.width, wp - 1..=wr - 1, hp - 1..=hr - 1),
        }
        .ok_or(PixFilterError::InternalSizeMismatch {
            context: "correlation candidate set",
            expected: 1,
            got: 0,
        })?;

        Ok(CorrelationResult::from_selection(
            selection,
            similarity_map,
            swapped,
            mode,
            Offset::new(center.0 as i64, center.1 as i64),
        ))
    }

    fn patch_luma(
        &self,
        luma_a: PixelView<'_>,
        cx: i64,
        cy: i64,
        radius: usize,
        luma_b: PixelView<'_>,
    ) -> PixFilterResult<CorrelationResult> {
        let inside_x = cx >= 0 && (cx as usize) < luma_a.width();
        let inside_y = cy >= 0 && (cy as usize) < luma_a.height();
        if !inside_x || !inside_y {
            return Err(PixFilterError::InvalidInput(
                "patch center must lie inside the first image",
            ));
        }
        let _span = trace_span!("match_patch", cx = cx, cy = cy, radius = radius).entered();

        let costs = patch::patch_costs(luma_a, cx, cy, radius, luma_b, self.config.parallel)?;
        let (w, h) = (luma_b.width(), luma_b.height());
        let similarity_map = render_similarity(&costs, w, h);
        let selection = select_exact(&costs, w, 0..=w - 1, 0..=h - 1)
            .ok_or(PixFilterError::InvalidInput("second image has no pixels"))?;

        Ok(CorrelationResult::from_selection(
            selection,
            similarity_map,
            false,
            CorrelationMode::Patch { x: cx, y: cy, radius },
            Offset::new(cx, cy),
        ))
    }
}

fn grid_costs(grid: &CostGrid, mode: CorrelationMode) -> PixFilterResult<Vec<Option<f64>>> {
    (0..grid.height)
        .flat_map(|j| (0..grid.width).map(move |i| (i, j)))
        .map(|(i, j)| match (grid.get(i, j), mode) {
            (None, _) => Ok(None),
            (Some(c), CorrelationMode::Auto) => c.normalized().map(Some),
            (Some(c), _) => Ok(Some(c.sad as f64)),
        })
        .collect()
}

/// Correlates two raw RGBA buffers.
///
/// Identical buffers of identical size are auto-correlated; anything else is
/// cross-correlated with the default configuration.
pub fn compute_correlation(
    data1: &[u8],
    w1: usize,
    h1: usize,
    data2: &[u8],
    w2: usize,
    h2: usize,
) -> PixFilterResult<CorrelationResult> {
    let a = PixelView::rgba(data1, w1, h1)?;
    let b = PixelView::rgba(data2, w2, h2)?;
    let mode = if (w1, h1) == (w2, h2) && data1 == data2 {
        CorrelationMode::Auto
    } else {
        CorrelationMode::Cross
    };
    CorrelationMatcher::new().correlate(a, b, mode)
}

#[cfg(test)]
mod tests {
    use super::{compute_correlation, CorrelationConfig, CorrelationMatcher, CorrelationMode};
    use crate::image::PixelBuffer;
    use crate::window::Offset;

    fn gray(values: &[u8], width: usize, height: usize) -> PixelBuffer {
        let data = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        PixelBuffer::from_rgba(data, width, height).unwrap()
    }

    #[test]
    fn map_covers_every_displacement() {
        let a = gray(&[10; 12], 4, 3);
        let b = gray(&[10; 2], 2, 1);
        let result = CorrelationMatcher::new()
            .cross_correlate(a.view(), b.view())
            .unwrap();
        assert_eq!(result.similarity_map.width(), 6);
        assert_eq!(result.similarity_map.height(), 4);
        assert_eq!(result.similarity_map.channels(), 1);
    }

    #[test]
    fn auto_correlation_reports_center_last() {
        let a = gray(&[0, 100, 0, 100, 0, 100], 6, 1);
        let result = CorrelationMatcher::new().auto_correlate(a.view()).unwrap();
        assert_eq!(result.best_offsets.last(), Some(&Offset::ZERO));
        assert_eq!(result.center_value, Some(0.0));
        assert!(result.best_offsets.contains(&Offset::new(2, 0)));
        assert!(result.best_offsets.contains(&Offset::new(-2, 0)));
        assert!(!result.swapped);
    }

    #[test]
    fn cross_correlation_finds_template() {
        #[rustfmt::skip]
        let big = gray(&[
            0, 0, 0, 0, 0,
            0, 0, 9, 200, 0,
            0, 0, 50, 90, 0,
            0, 0, 0, 0, 0,
        ], 5, 4);
        let small = gray(&[9, 200, 50, 90], 2, 2);
        let matcher = CorrelationMatcher::new();

        let result = matcher.cross_correlate(big.view(), small.view()).unwrap();
        assert_eq!(result.best_offsets, vec![Offset::new(2, 1)]);
        assert_eq!(result.best_value, 0.0);
        assert!(!result.swapped);

        let result = matcher.cross_correlate(small.view(), big.view()).unwrap();
        assert!(result.swapped);
        assert_eq!(result.best_offsets, vec![Offset::new(-2, -1)]);
    }

    #[test]
    fn cross_correlation_rejects_misfit_probe() {
        let wide = gray(&[0; 6], 6, 1);
        let tall = gray(&[0; 4], 2, 2);
        let err = CorrelationMatcher::new()
            .cross_correlate(wide.view(), tall.view())
            .unwrap_err();
        assert!(matches!(err, crate::PixFilterError::InvalidInput(_)));
    }

    #[test]
    fn patch_mode_locates_neighborhood() {
        let values: Vec<u8> = (0u8..20).map(|v| v * 11).collect();
        let a = gray(&values, 5, 4);
        let result = CorrelationMatcher::new()
            .match_patch(a.view(), 1, 2, 1, a.view())
            .unwrap();
        assert_eq!(result.mode, CorrelationMode::Patch { x: 1, y: 2, radius: 1 });
        assert_eq!(result.best_offsets, vec![Offset::ZERO]);
        assert_eq!(result.similarity_map.width(), 5);
        assert_eq!(result.offset_at(1, 2), Offset::ZERO);
    }

    #[test]
    fn patch_center_outside_first_image_fails() {
        let a = gray(&[0; 4], 2, 2);
        assert!(CorrelationMatcher::new()
            .match_patch(a.view(), 2, 0, 1, a.view())
            .is_err());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let a = gray(&[0; 4], 2, 2);
        let matcher = CorrelationMatcher::new()
            .with_config(CorrelationConfig::default().with_auto_tie_tolerance(-1.0));
        assert_eq!(matcher.config().auto_tie_tolerance, -1.0);
        assert!(matcher.auto_correlate(a.view()).is_err());
        assert_eq!(*CorrelationMatcher::new().config(), CorrelationConfig::default());
    }

    #[test]
    fn raw_entry_point_dispatches_on_identity() {
        let a = gray(&[5, 80, 5, 80], 4, 1);
        let data = a.data().to_vec();
        let result = compute_correlation(&data, 4, 1, &data, 4, 1).unwrap();
        assert_eq!(result.mode, CorrelationMode::Auto);

        let b = gray(&[80], 1, 1);
        let result = compute_correlation(&data, 4, 1, b.data(), 1, 1).unwrap();
        assert_eq!(result.mode, CorrelationMode::Cross);
        assert_eq!(result.best_offsets, vec![Offset::new(1, 0), Offset::new(3, 0)]);
    }
}
