//! Per-channel median filter.

use crate::filter::exec::map_pixels;
use crate::filter::{radius_param, Execution, FilterDescriptor, FilterKernel, FilterParams};
use crate::image::{PixelBuffer, PixelView};
use crate::trace::trace_span;
use crate::util::math::to_radius;
use crate::util::PixFilterResult;
use crate::window::extract_window_into;

/// Registry metadata for [`MedianFilter`].
pub static MEDIAN_FILTER: FilterDescriptor = FilterDescriptor {
    id: "medianFilter",
    name: "Median Filter",
    params: &[radius_param(1.0)],
};

/// Replaces every channel with the median of that channel over the window.
///
/// The sample at index `count / 2` of the sorted values is taken, i.e. the
/// upper median when `count` is even. Window counts are odd squares, so this
/// is the exact median in practice.
pub fn median(
    src: PixelView<'_>,
    radius: usize,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    let _span = trace_span!("median", radius = radius).entered();
    let channels = src.channels();

    map_pixels(src, exec, |x, y, scratch, out| {
        extract_window_into(src, x as i64, y as i64, radius, &mut scratch.window)?;
        for (c, slot) in out.iter_mut().enumerate() {
            scratch.values.clear();
            scratch
                .values
                .extend(scratch.window[c..].iter().step_by(channels).copied());
            scratch.values.sort_unstable();
            *slot = scratch.values[scratch.values.len() / 2];
        }
        Ok(())
    })
}

/// `medianFilter` registry entry.
pub struct MedianFilter;

impl FilterKernel for MedianFilter {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &MEDIAN_FILTER
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        let radius = to_radius(params.require(&MEDIAN_FILTER, "radius")?);
        median(src, radius, exec)
    }
}
