//! Box and Gaussian blur.
//!
//! Both blurs evaluate the full `(2r+1)^2` window per output pixel
//! (O(n r^2)). Every channel, alpha included, is averaged.

use crate::filter::exec::map_pixels;
use crate::filter::{
    radius_param, Execution, FilterDescriptor, FilterKernel, FilterParams, ParamDescriptor,
};
use crate::image::{PixelBuffer, PixelView};
use crate::kernel::GaussianKernel;
use crate::trace::trace_span;
use crate::util::math::{round_to_u8, to_radius, window_shape};
use crate::util::PixFilterResult;
use crate::window::extract_window_into;

/// Registry metadata for [`BoxBlur`].
pub static BOX_BLUR: FilterDescriptor = FilterDescriptor {
    id: "boxBlur",
    name: "Box Blur",
    params: &[radius_param(2.0)],
};

/// Registry metadata for [`GaussianBlur`].
pub static GAUSSIAN_BLUR: FilterDescriptor = FilterDescriptor {
    id: "gaussianBlur",
    name: "Gaussian Blur",
    params: &[
        radius_param(10.0),
        ParamDescriptor {
            id: "stdDeviation",
            name: "\u{03c3}",
            default: 3.0,
            min: 0.5,
            max: 10.0,
            step: 0.5,
        },
    ],
};

/// Unweighted mean over the clamp-padded window of `radius`.
pub fn box_blur(
    src: PixelView<'_>,
    radius: usize,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    let _span = trace_span!("box_blur", radius = radius).entered();
    let channels = src.channels();
    let (_, area) = window_shape(radius, 1)?;
    let count = area as f64;

    map_pixels(src, exec, |x, y, scratch, out| {
        extract_window_into(src, x as i64, y as i64, radius, &mut scratch.window)?;
        for (c, slot) in out.iter_mut().enumerate() {
            let sum: u32 = scratch.window[c..]
                .iter()
                .step_by(channels)
                .map(|&v| u32::from(v))
                .sum();
            *slot = round_to_u8(f64::from(sum) / count);
        }
        Ok(())
    })
}

/// Gaussian-weighted mean with an explicit standard deviation.
pub fn gaussian_blur(
    src: PixelView<'_>,
    radius: usize,
    sigma: f64,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    let kernel = GaussianKernel::new(radius, sigma)?;
    blur_with_kernel(src, &kernel, exec)
}

/// Gaussian blur with `sigma = radius / 3`.
pub fn gaussian_blur_auto(
    src: PixelView<'_>,
    radius: usize,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    let kernel = GaussianKernel::from_radius(radius)?;
    blur_with_kernel(src, &kernel, exec)
}

fn blur_with_kernel(
    src: PixelView<'_>,
    kernel: &GaussianKernel,
    exec: Execution,
) -> PixFilterResult<PixelBuffer> {
    let _span = trace_span!(
        "gaussian_blur",
        radius = kernel.radius(),
        sigma = kernel.sigma()
    )
    .entered();
    let channels = src.channels();
    let radius = kernel.radius();

    map_pixels(src, exec, |x, y, scratch, out| {
        extract_window_into(src, x as i64, y as i64, radius, &mut scratch.window)?;
        for (c, slot) in out.iter_mut().enumerate() {
            *slot = round_to_u8(kernel.weighted_channel(&scratch.window, channels, c));
        }
        Ok(())
    })
}

/// `boxBlur` registry entry.
pub struct BoxBlur;

impl FilterKernel for BoxBlur {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &BOX_BLUR
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        let radius = to_radius(params.require(&BOX_BLUR, "radius")?);
        box_blur(src, radius, exec)
    }
}

/// `gaussianBlur` registry entry.
pub struct GaussianBlur;

impl FilterKernel for GaussianBlur {
    fn descriptor(&self) -> &'static FilterDescriptor {
        &GAUSSIAN_BLUR
    }

    fn apply(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        let radius = to_radius(params.require(&GAUSSIAN_BLUR, "radius")?);
        let sigma = params.require(&GAUSSIAN_BLUR, "stdDeviation")?;
        gaussian_blur(src, radius, sigma, exec)
    }
}
