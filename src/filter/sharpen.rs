//! Edge-gated unsharp masking.
//!
//! Pass one computes the Sobel magnitude map. A pixel is an edge when the sum
//! of its color-channel magnitudes exceeds `color_channels * threshold`. Pass
//! two leaves non-edge pixels untouched and replaces edge pixels with
//! `blurred + amount * (original - blurred)`, where `blurred` is the Gaussian
//! mean over a window of `radius` with `sigma = radius / 3`.

use crate::filter::exec::map_pixels;
use crate::filter::sobel::sobel;
use crate::filter::{
    radius_param, Execution, FilterDescriptor, FilterKernel, FilterParams, ParamDescriptor,
};
use crate::image::{PixelBuffer, PixelView};
use crate::kernel::GaussianKernel;
use crate::trace::{trace_event, trace_span};
use crate::util::math::{round_to_u8, to_radius};
use crate::util::{PixFilterError, PixFilterResult};
use crate::window::extract_window_into;

/// Registry metadata for [`Sharpen`].
pub static SHARPEN: FilterDescriptor = FilterDescriptor {
    id: "sharpen",
    name: "Sharpen",
    params: &[
        ParamDescriptor {
            id: "amount",
            name: "Amount",
            default: 1.5,
            min: 0.0,
            max: 10.0,
            step: 0.1,
        },
        radius_param(2.0),
        ParamDescriptor {
            id: "threshold",
            name: "Threshold",
            default: 20.0,
            min: 0.0,
            max: 255.0,
            step: 1.0,
        },
    ],
};

/// Sharpens edge pixels only; alpha is copied from the source.
pub fn sharpen(
    src: PixelView<'_>,
    amount: f64,
    radius: usize,
    threshold: f64,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    if !amount.is_finite() || !threshold.is_finite() {
        return Err(PixFilterError::InvalidInput(
            "sharpen amount and threshold must be finite",
        ));
    }
    let _span = trace_span!("sharpen", amount = amount, radius = radius).entered();

    let kernel = GaussianKernel::from_radius(radius)?;
    let edges = sobel(src, exec)?;
    let channels = src.channels();
    let color = src.color_channels();
    let limit = color as f64 * threshold;
    let source = src.as_slice();
    let edge_data = edges.data();

    let is_edge = |idx: usize| -> bool {
        let sum: u32 = edge_data[idx..idx + color]
            .iter()
            .map(|&v| u32::from(v))
            .sum();
        f64::from(sum) > limit
    };

    let edge_pixels = (0..src.width() * src.height())
        .filter(|&i| is_edge(i * channels))
        .count();
    trace_event!("sharpen_edges", count = edge_pixels);

    map_pixels(src, exec, |x, y, scratch, out| {
        let idx = (y * src.width() + x) * channels;
        let original = &source[idx..idx + channels];
        out.copy_from_slice(original);
        if !is_edge(idx) {
            return Ok(());
        }

        extract_window_into(src, x as i64, y as i64, radius, &mut scratch.window)?;
        for (c, slot) in out.iter_mut().enumerate().take(color) {
            let blurred = kernel.weighted_channel(&scratch.window, channels, c);
            let value = blurred + amount * (f64::from(original[c]) - blurred);
            *slot = round_to_u8(value);
        }
        Ok(())
    })
}

/// `sharpen` registry entry.
pub struct Sharpen;

impl FilterKernel for Sharpen {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &SHARPEN
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        let amount = params.require(&SHARPEN, "amount")?;
        let radius = to_radius(params.require(&SHARPEN, "radius")?);
        let threshold = params.require(&SHARPEN, "threshold")?;
        sharpen(src, amount, radius, threshold, exec)
    }
}

#[cfg(test)]
mod tests {
    use super::sharpen;
    use crate::filter::Execution;
    use crate::image::{PixelBuffer, PixelView};

    fn step_image() -> Vec<u8> {
        // 6x1 luma step: dark half then bright half.
        vec![40u8, 40, 40, 200, 200, 200]
    }

    #[test]
    fn flat_image_is_unchanged() {
        let img = PixelBuffer::filled(5, 4, &[90, 10, 30, 128]).unwrap();
        let out = sharpen(img.view(), 3.0, 2, 0.0, Execution::Sequential).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn step_gets_overshoot_on_both_sides() {
        let data = step_image();
        let view = PixelView::luma(&data, 6, 1).unwrap();
        let out = sharpen(view, 2.0, 1, 10.0, Execution::Sequential).unwrap();
        let d = out.data();
        assert!(d[2] < 40, "dark side should darken, got {}", d[2]);
        assert!(d[3] > 200, "bright side should brighten, got {}", d[3]);
        assert_eq!(d[0], 40);
        assert_eq!(d[5], 200);
    }

    #[test]
    fn high_threshold_disables_sharpening() {
        let data = step_image();
        let view = PixelView::luma(&data, 6, 1).unwrap();
        let out = sharpen(view, 2.0, 1, 255.0, Execution::Sequential).unwrap();
        assert_eq!(out.data(), data.as_slice());
    }

    #[test]
    fn amount_one_reproduces_source() {
        let data = step_image();
        let view = PixelView::luma(&data, 6, 1).unwrap();
        let out = sharpen(view, 1.0, 2, 0.0, Execution::Sequential).unwrap();
        assert_eq!(out.data(), data.as_slice());
    }
}
