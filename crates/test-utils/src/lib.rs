//! Test helpers for the grid verification crates.
//!
//! - [`generators`]: small synthetic fields with known statistics
//! - [`fixtures`]: grid specification strings and polygon outlines
//! - assertion macros for floats, coordinate pairs and whole planes
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{assert_planes_approx_eq, create_checkerboard, grid_spec};
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

#[doc(hidden)]
pub use vx_common;

/// Asserts `|left - right| <= tol`, with an optional context message.
///
/// ```ignore
/// assert_approx_eq!(dist.get(3, 4), 5.0, 1e-12);
/// assert_approx_eq!(frac, 0.5, 1e-12, "cell ({}, {})", x, y);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tol:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $tol, "values differ")
    };
    ($left:expr, $right:expr, $tol:expr, $($ctx:tt)+) => {{
        let (l, r, tol) = ($left as f64, $right as f64, $tol as f64);
        if !((l - r).abs() <= tol) {
            panic!(
                "{}: {} vs {} (off by {}, tolerance {})",
                format_args!($($ctx)+),
                l,
                r,
                (l - r).abs(),
                tol
            );
        }
    }};
}

/// Asserts both members of two `(a, b)` pairs agree within `tol`.
///
/// ```ignore
/// assert_coords_approx_eq!(grid.xy_to_latlon(2.0, 2.0), (2.0, 2.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $tol:expr $(,)?) => {{
        let (l, r): ((f64, f64), (f64, f64)) = ($left, $right);
        $crate::assert_approx_eq!(l.0, r.0, $tol, "first coordinate of {:?} vs {:?}", l, r);
        $crate::assert_approx_eq!(l.1, r.1, $tol, "second coordinate of {:?} vs {:?}", l, r);
    }};
}

/// Asserts two fields have the same shape and agree cell by cell, with
/// missing values matching missing values.
///
/// ```ignore
/// assert_planes_approx_eq!(&smoothed, &expected, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_planes_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &$crate::vx_common::DataPlane = $left;
        let right: &$crate::vx_common::DataPlane = $right;
        assert_eq!(left.dims(), right.dims(), "plane dimensions differ");
        for y in 0..left.ny() {
            for x in 0..left.nx() {
                let (a, b) = (left.get(x, y), right.get(x, y));
                let a_missing = $crate::vx_common::is_bad_data(a);
                let b_missing = $crate::vx_common::is_bad_data(b);
                if a_missing || b_missing {
                    assert!(
                        a_missing && b_missing,
                        "missing mismatch at ({}, {}): {} vs {}",
                        x,
                        y,
                        a,
                        b
                    );
                } else if (a - b).abs() > $epsilon {
                    panic!(
                        "planes differ at ({}, {}): {} vs {} (epsilon {})",
                        x, y, a, b, $epsilon
                    );
                }
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use vx_common::BAD_DATA;

    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(2.0_f64.sqrt() * 2.0_f64.sqrt(), 2.0, 1e-12);
        assert_approx_eq!(-9999.0, BAD_DATA, 0.0);
        assert_approx_eq!(0.25, 0.2500001, 1e-6, "coverage at ({}, {})", 1, 2);
    }

    #[test]
    #[should_panic(expected = "coverage at (1, 2)")]
    fn test_approx_eq_reports_context() {
        assert_approx_eq!(0.25, 0.5, 1e-6, "coverage at ({}, {})", 1, 2);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn test_approx_eq_nan_never_matches() {
        assert_approx_eq!(f64::NAN, f64::NAN, 1.0);
    }

    #[test]
    fn test_coords_approx_eq() {
        assert_coords_approx_eq!((40.0, -105.0), (40.0 + 1e-10, -105.0), 1e-9);
    }

    #[test]
    #[should_panic(expected = "second coordinate")]
    fn test_coords_approx_eq_names_the_failing_member() {
        assert_coords_approx_eq!((40.0, -105.0), (40.0, -104.0), 1e-9);
    }

    #[test]
    fn test_assert_planes_matches_missing() {
        let a = with_missing(create_ramp(3, 3, 1.0), &[(0, 0)]);
        let mut b = create_ramp(3, 3, 1.0);
        b.set(0, 0, BAD_DATA);
        assert_planes_approx_eq!(&a, &b, 1e-12);
    }

    #[test]
    #[should_panic(expected = "missing mismatch")]
    fn test_assert_planes_detects_missing_mismatch() {
        let a = with_missing(create_ramp(3, 3, 1.0), &[(0, 0)]);
        let b = create_ramp(3, 3, 1.0);
        assert_planes_approx_eq!(&a, &b, 1e-12);
    }
}
