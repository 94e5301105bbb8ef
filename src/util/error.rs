//! Error types for pixfilter.

use thiserror::Error;

/// Result alias for pixfilter operations.
pub type PixFilterResult<T> = std::result::Result<T, PixFilterError>;

/// Errors that can occur when running filters or correlation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PixFilterError {
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The pixel buffer length does not match `width * height * channels`.
    #[error("buffer size mismatch: needed {needed} elements, got {got}")]
    BufferSizeMismatch { needed: usize, got: usize },
    /// Only 1 (luma) and 4 (RGBA) channels are supported.
    #[error("unsupported channel count: {channels}")]
    UnsupportedChannels { channels: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A declared filter parameter was not supplied.
    #[error("filter `{filter}` is missing parameter `{param}`")]
    MissingParameter { filter: String, param: String },
    /// A filter parameter lies outside its declared range.
    #[error("parameter `{param}` is out of range: {value} is not in [{min}, {max}]")]
    ParameterOutOfRange {
        param: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// No filter is registered under the requested id.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    /// Internal bookkeeping produced an inconsistent size or a degenerate value.
    #[error("internal size mismatch in {context}: expected {expected}, got {got}")]
    InternalSizeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    /// Image decoding or encoding failed.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
