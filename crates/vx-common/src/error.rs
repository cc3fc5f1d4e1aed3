//! Error types for plane and threshold operations.

use thiserror::Error;

/// Result type alias using VxError.
pub type VxResult<T> = Result<T, VxError>;

/// Errors raised by structural problems with planes and thresholds.
///
/// Per-cell data problems (a cell without enough valid neighbours, say) are
/// never errors; they are written into the output as missing values.
#[derive(Debug, Error)]
pub enum VxError {
    #[error("dimension mismatch in {op}: expected {expected_nx}x{expected_ny}, got {actual_nx}x{actual_ny}")]
    DimensionMismatch {
        op: String,
        expected_nx: usize,
        expected_ny: usize,
        actual_nx: usize,
        actual_ny: usize,
    },

    #[error("index ({x}, {y}) out of range for {nx}x{ny} plane")]
    OutOfRange { x: i64, y: i64, nx: usize, ny: usize },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl VxError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(
        op: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            op: op.into(),
            expected_nx: expected.0,
            expected_ny: expected.1,
            actual_nx: actual.0,
            actual_ny: actual.1,
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(x: i64, y: i64, nx: usize, ny: usize) -> Self {
        Self::OutOfRange { x, y, nx, ny }
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Fail with a dimension mismatch unless both shapes agree.
pub fn check_dims(op: &str, expected: (usize, usize), actual: (usize, usize)) -> VxResult<()> {
    if expected != actual {
        return Err(VxError::dimension_mismatch(op, expected, actual));
    }
    Ok(())
}
