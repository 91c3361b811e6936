//! Error types for the detection pipeline

use thiserror::Error;

use crate::models::PixelFormat;

/// Errors surfaced by the detection pipeline and sweep engine
///
/// The pipeline itself is a chain of pure functions; faults only come from
/// malformed inputs, so the variants stay small. Zero-area images are not an
/// error and produce an empty region list instead.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// Pixel buffer length does not match the declared dimensions and format
    #[error(
        "pixel buffer is {got} bytes but {width}x{height} {format} needs {expected}"
    )]
    BufferSize {
        /// Declared image width
        width: usize,
        /// Declared image height
        height: usize,
        /// Declared pixel format
        format: PixelFormat,
        /// Expected buffer length in bytes
        expected: usize,
        /// Actual buffer length in bytes
        got: usize,
    },

    /// A configuration value is out of its documented range
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },

    /// Configuration JSON could not be parsed
    #[error("configuration parse")]
    ConfigParse(#[from] serde_json::Error),
}
