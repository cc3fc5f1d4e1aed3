//! Error types for grid construction.

use thiserror::Error;

/// Errors raised while building or looking up a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Malformed grid specification string.
    #[error("invalid grid specification: {0}")]
    InvalidSpec(String),

    /// Hemisphere flag other than `N` or `S`.
    #[error("bad hemisphere '{0}', expected N or S")]
    BadHemisphere(String),

    /// Projection name not recognised.
    #[error("unknown projection type: {0}")]
    UnknownProjection(String),

    /// No catalog entry with this name.
    #[error("grid not found: {0}")]
    GridNotFound(String),

    /// Grid with a non-positive dimension.
    #[error("invalid grid dimensions {nx}x{ny}")]
    InvalidDimensions { nx: i64, ny: i64 },

    /// Parameters that do not describe a usable projection.
    #[error("invalid projection parameters: {0}")]
    InvalidParameters(String),
}

impl GridError {
    /// Create an InvalidSpec error.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    /// Create an InvalidParameters error.
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Reject grids with a zero dimension.
pub(crate) fn check_dimensions(nx: usize, ny: usize) -> Result<()> {
    if nx == 0 || ny == 0 {
        return Err(GridError::InvalidDimensions {
            nx: nx as i64,
            ny: ny as i64,
        });
    }
    Ok(())
}
