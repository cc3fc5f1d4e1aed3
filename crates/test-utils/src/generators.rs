//! Synthetic field generators.
//!
//! These generators create predictable, verifiable event patterns for the
//! neighborhood, distance and mask tests. All fields are [`DataPlane`]s with
//! `(0, 0)` at the lower-left cell.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vx_common::{DataPlane, BAD_DATA};

/// Creates a field whose value encodes its position: `x * 1000 + y`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(10, 5);
/// assert_eq!(field.get(0, 0), 0.0);
/// assert_eq!(field.get(1, 0), 1000.0);
/// assert_eq!(field.get(0, 1), 1.0);
/// ```
pub fn create_index_field(nx: usize, ny: usize) -> DataPlane {
    DataPlane::from_fn(nx, ny, |x, y| (x * 1000 + y) as f64)
}

/// Creates a checkerboard of 1.0 and 0.0, with 1.0 where `x + y` is even.
pub fn create_checkerboard(nx: usize, ny: usize) -> DataPlane {
    DataPlane::from_fn(nx, ny, |x, y| if (x + y) % 2 == 0 { 1.0 } else { 0.0 })
}

/// Creates an all-zero field with a single 1.0 event at `(ex, ey)`.
pub fn create_single_event(nx: usize, ny: usize, ex: usize, ey: usize) -> DataPlane {
    DataPlane::from_fn(nx, ny, |x, y| if x == ex && y == ey { 1.0 } else { 0.0 })
}

/// Creates a field increasing linearly from 0 along x: `value = x * step`.
pub fn create_ramp(nx: usize, ny: usize, step: f64) -> DataPlane {
    DataPlane::from_fn(nx, ny, |x, _| x as f64 * step)
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(nx: usize, ny: usize, value: f64) -> DataPlane {
    DataPlane::filled(nx, ny, value)
}

/// Creates a field of precipitation-like values in mm, seeded for
/// reproducibility.
///
/// About `event_fraction` of the cells hold a positive amount up to 50 mm,
/// the rest are 0.0, and about `missing_fraction` are replaced with
/// [`BAD_DATA`].
pub fn create_random_field(
    nx: usize,
    ny: usize,
    event_fraction: f64,
    missing_fraction: f64,
    seed: u64,
) -> DataPlane {
    let mut rng = StdRng::seed_from_u64(seed);
    DataPlane::from_fn(nx, ny, |_, _| {
        if rng.gen_bool(missing_fraction) {
            BAD_DATA
        } else if rng.gen_bool(event_fraction) {
            rng.gen_range(0.1..50.0)
        } else {
            0.0
        }
    })
}

/// Replaces the listed `(x, y)` cells with [`BAD_DATA`].
pub fn with_missing(mut field: DataPlane, cells: &[(usize, usize)]) -> DataPlane {
    for &(x, y) in cells {
        if x < field.nx() && y < field.ny() {
            field.set(x, y, BAD_DATA);
        }
    }
    field
}
