//! Low-level building blocks for custom filter pipelines.
//!
//! These items expose the neighborhood primitive, kernel weights and the
//! luma reduction used internally by the filters and the matcher. Most users
//! should prefer `FilterRegistry` and `CorrelationMatcher`.

pub use crate::image::luma::to_luma;
pub use crate::kernel::sobel::{gradient_at, magnitude};
pub use crate::kernel::{GaussianKernel, SOBEL_X, SOBEL_Y};
pub use crate::window::{extract_window, extract_window_into, source_index};
