//! Immutable id -> filter lookup.

use crate::filter::{
    BoxBlur, Execution, FilterDescriptor, FilterKernel, FilterParams, GaussianBlur, InvertColors,
    MedianFilter, Sharpen, SobelOperator,
};
use crate::image::{PixelBuffer, PixelView};
use crate::trace::trace_span;
use crate::util::{PixFilterError, PixFilterResult};

/// A fixed set of filters addressable by their descriptor id.
///
/// Built once and shared by reference; there is no global registry.
pub struct FilterRegistry {
    kernels: Vec<Box<dyn FilterKernel>>,
    exec: Execution,
}

impl FilterRegistry {
    /// Registry with the six built-in filters.
    pub fn standard() -> Self {
        Self::empty()
            .with_kernel(InvertColors)
            .with_kernel(BoxBlur)
            .with_kernel(GaussianBlur)
            .with_kernel(MedianFilter)
            .with_kernel(SobelOperator)
            .with_kernel(Sharpen)
    }

    /// Registry with no filters.
    pub fn empty() -> Self {
        Self {
            kernels: Vec::new(),
            exec: Execution::default(),
        }
    }

    /// Adds a filter. A later registration with the same id replaces the
    /// earlier one.
    pub fn with_kernel<K: FilterKernel + 'static>(mut self, kernel: K) -> Self {
        let id = kernel.descriptor().id;
        self.kernels.retain(|k| k.descriptor().id != id);
        self.kernels.push(Box::new(kernel));
        self
    }

    /// Sets how filter passes schedule their pixel loop.
    pub fn with_execution(mut self, exec: Execution) -> Self {
        self.exec = exec;
        self
    }

    /// Returns the configured execution mode.
    pub fn execution(&self) -> Execution {
        self.exec
    }

    /// Looks up a filter by id.
    pub fn get(&self, id: &str) -> Option<&dyn FilterKernel> {
        self.kernels
            .iter()
            .find(|k| k.descriptor().id == id)
            .map(|k| &**k)
    }

    /// Descriptors of all registered filters in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static FilterDescriptor> + '_ {
        self.kernels.iter().map(|k| k.descriptor())
    }

    /// Runs filter `id` over `src`.
    ///
    /// Fails with `UnknownFilter` for an unregistered id, and with
    /// `MissingParameter`/`ParameterOutOfRange` before any pixel is read.
    pub fn apply_filter(
        &self,
        id: &str,
        src: PixelView<'_>,
        params: &FilterParams,
    ) -> PixFilterResult<PixelBuffer> {
        let kernel = self
            .get(id)
            .ok_or_else(|| PixFilterError::UnknownFilter(id.to_string()))?;
        let _span = trace_span!(
            "apply_filter",
            id = id,
            width = src.width(),
            height = src.height()
        )
        .entered();
        kernel.run(src, params, self.exec)
    }

    /// Runs filter `id` over a raw RGBA array and returns the raw result.
    pub fn apply_filter_rgba(
        &self,
        id: &str,
        data: &[u8],
        width: usize,
        height: usize,
        params: &FilterParams,
    ) -> PixFilterResult<Vec<u8>> {
        let kernel = self
            .get(id)
            .ok_or_else(|| PixFilterError::UnknownFilter(id.to_string()))?;
        params.validate(kernel.descriptor())?;
        let src = PixelView::rgba(data, width, height)?;
        Ok(self.apply_filter(id, src, params)?.into_vec())
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
