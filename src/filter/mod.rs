//! Window-based pixel filters.
//!
//! Every filter reads an immutable `PixelView` and returns a freshly
//! allocated `PixelBuffer` of identical shape. Filters are exposed both as
//! typed functions (`box_blur`, `sobel`, ...) and as `FilterKernel` trait
//! objects that a `FilterRegistry` dispatches to by string id.

use crate::image::{PixelBuffer, PixelView};
use crate::util::PixFilterResult;

mod blur;
mod exec;
mod invert;
mod median;
mod params;
mod registry;
mod sharpen;
mod sobel;

pub use blur::{
    box_blur, gaussian_blur, gaussian_blur_auto, BoxBlur, GaussianBlur, BOX_BLUR, GAUSSIAN_BLUR,
};
pub use exec::Execution;
pub use invert::{invert, InvertColors, INVERT_COLORS};
pub use median::{median, MedianFilter, MEDIAN_FILTER};
pub use params::{FilterDescriptor, FilterParams, ParamDescriptor};
pub use registry::FilterRegistry;
pub use sharpen::{sharpen, Sharpen, SHARPEN};
pub use sobel::{sobel, SobelOperator, SOBEL_OPERATOR};

/// A filter that can be looked up and run by id.
pub trait FilterKernel: Send + Sync {
    /// Static metadata: id, display name and parameter declarations.
    fn descriptor(&self) -> &'static FilterDescriptor;

    /// Runs the filter. Parameters are read with range checks.
    fn apply(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer>;

    /// Validates every declared parameter, then runs the filter.
    fn run(
        &self,
        src: PixelView<'_>,
        params: &FilterParams,
        exec: Execution,
    ) -> PixFilterResult<PixelBuffer> {
        params.validate(self.descriptor())?;
        self.apply(src, params, exec)
    }
}

/// Shared parameter declaration for integer radii.
pub(crate) const fn radius_param(default: f64) -> ParamDescriptor {
    ParamDescriptor {
        id: "radius",
        name: "Radius",
        default,
        min: 1.0,
        max: 10.0,
        step: 1.0,
    }
}
