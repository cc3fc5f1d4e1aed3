//! Error types for neighborhood and mask processing.

use projection::GridError;
use thiserror::Error;
use vx_common::VxError;

/// Errors that can occur while processing a field.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Invalid engine configuration (width, thresholds, Gaussian parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// Interpolation method that the requested operation does not support.
    #[error("unsupported interpolation method: {0}")]
    UnsupportedMethod(String),

    /// Neighborhood shape that is unknown or cannot be built at this width.
    #[error("unsupported template shape: {0}")]
    UnsupportedShape(String),

    /// A template window moved off the grid.
    #[error("template base ({x}, {y}) is outside the {nx}x{ny} grid")]
    OutOfRange { x: i64, y: i64, nx: usize, ny: usize },

    /// Data plane or mask error.
    #[error(transparent)]
    Common(#[from] VxError),

    /// Grid construction error.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Failed to read a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcessorError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an UnsupportedMethod error.
    pub fn unsupported_method(method: impl std::fmt::Display) -> Self {
        Self::UnsupportedMethod(method.to_string())
    }

    /// Create an UnsupportedShape error.
    pub fn unsupported_shape(msg: impl Into<String>) -> Self {
        Self::UnsupportedShape(msg.into())
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(x: i64, y: i64, nx: usize, ny: usize) -> Self {
        Self::OutOfRange { x, y, nx, ny }
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
