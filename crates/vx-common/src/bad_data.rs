//! Missing-value sentinel and float comparison helpers.

/// Sentinel stored in a cell that has no valid value.
pub const BAD_DATA: f64 = -9999.0;

/// Tolerance used when comparing against the sentinel.
const BAD_DATA_TOL: f64 = 1.0e-4;

/// Returns true for the missing-value sentinel and for NaN.
///
/// Readers upstream of this crate occasionally hand over NaN for missing
/// cells, so both encodings are treated as missing everywhere.
#[inline]
pub fn is_bad_data(v: f64) -> bool {
    v.is_nan() || (v - BAD_DATA).abs() < BAD_DATA_TOL
}

/// Approximate equality with an absolute tolerance.
#[inline]
pub fn is_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}
