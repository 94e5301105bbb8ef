//! Weight kernels consumed by the window-based filters.

pub mod gaussian;
pub mod sobel;

pub use gaussian::GaussianKernel;
pub use sobel::{SOBEL_X, SOBEL_Y};
