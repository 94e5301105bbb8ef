//! PixFilter is a CPU pixel-buffer filter library with a correlation matcher.
//!
//! Filters operate on interleaved RGBA or single-channel luma buffers and
//! share one clamp-to-edge neighborhood primitive. The correlation matcher
//! reduces two images to luma and searches every relative offset for the
//! best alignment. Outer pixel loops can run on rayon via the `rayon`
//! feature; spans and events are emitted through `tracing` when that
//! feature is enabled.

pub mod correlate;
pub mod filter;
pub mod image;
pub mod kernel;
pub mod lowlevel;
mod trace;
pub mod util;
pub mod window;

pub use correlate::{
    compute_correlation, CorrelationConfig, CorrelationMatcher, CorrelationMode,
    CorrelationResult,
};
pub use filter::{Execution, FilterDescriptor, FilterKernel, FilterParams, FilterRegistry};
pub use image::{PixelBuffer, PixelView};
pub use kernel::GaussianKernel;
pub use util::{PixFilterError, PixFilterResult};
pub use window::{extract_window, Offset};
