//! Dense two-dimensional data fields with a missing-value sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bad_data::{is_bad_data, BAD_DATA};
use crate::error::{check_dims, VxError, VxResult};
use crate::mask::MaskPlane;
use crate::threshold::SingleThresh;

/// Direction used by [`DataPlane::gradient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// An `nx * ny` field of values over a grid.
///
/// Storage is row-major with `(0, 0)` at the lower-left cell, so the value
/// at `(x, y)` lives at index `y * nx + x`. Missing cells hold
/// [`BAD_DATA`] and are skipped by every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPlane {
    nx: usize,
    ny: usize,
    data: Vec<f64>,

    /// Model initialization time.
    pub init: Option<DateTime<Utc>>,
    /// Valid time of the field.
    pub valid: Option<DateTime<Utc>>,
    /// Forecast lead in seconds.
    pub lead_secs: i64,
    /// Accumulation interval in seconds (0 for instantaneous fields).
    pub accum_secs: i64,
}

impl DataPlane {
    /// Create a plane with every cell set to zero.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, 0.0)
    }

    /// Create a plane with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
            init: None,
            valid: None,
            lead_secs: 0,
            accum_secs: 0,
        }
    }

    /// Wrap existing row-major values.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> VxResult<Self> {
        if data.len() != nx * ny {
            return Err(VxError::invalid_argument(format!(
                "{} values supplied for a {}x{} plane",
                data.len(),
                nx,
                ny
            )));
        }
        let mut plane = Self::filled(0, 0, 0.0);
        plane.nx = nx;
        plane.ny = ny;
        plane.data = data;
        Ok(plane)
    }

    /// Build a plane by evaluating `f(x, y)` at every cell.
    pub fn from_fn<F>(nx: usize, ny: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(nx * ny);
        for y in 0..ny {
            for x in 0..nx {
                data.push(f(x, y));
            }
        }
        Self {
            nx,
            ny,
            data,
            init: None,
            valid: None,
            lead_secs: 0,
            accum_secs: 0,
        }
    }

    /// Resize the plane, resetting every cell to zero.
    pub fn set_size(&mut self, nx: usize, ny: usize) {
        self.nx = nx;
        self.ny = ny;
        self.data.clear();
        self.data.resize(nx * ny, 0.0);
    }

    /// Copy the timing metadata from another plane.
    pub fn copy_timing(&mut self, other: &DataPlane) {
        self.init = other.init;
        self.valid = other.valid;
        self.lead_secs = other.lead_secs;
        self.accum_secs = other.accum_secs;
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nxy(&self) -> usize {
        self.nx * self.ny
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Whether `(x, y)` addresses a cell of this plane.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.nx && (y as usize) < self.ny
    }

    /// Flat index of `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the plane.
    #[inline]
    pub fn two_to_one(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.nx && y < self.ny,
            "DataPlane index ({}, {}) out of range for {}x{} plane",
            x,
            y,
            self.nx,
            self.ny
        );
        y * self.nx + x
    }

    /// Value at `(x, y)`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.two_to_one(x, y)]
    }

    /// Store `v` at `(x, y)`. Panics when out of range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        let n = self.two_to_one(x, y);
        self.data[n] = v;
    }

    /// Value at signed coordinates, `None` outside the plane.
    #[inline]
    pub fn try_get(&self, x: i64, y: i64) -> Option<f64> {
        if self.in_bounds(x, y) {
            Some(self.data[y as usize * self.nx + x as usize])
        } else {
            None
        }
    }

    /// Checked store.
    pub fn try_set(&mut self, x: i64, y: i64, v: f64) -> VxResult<()> {
        if !self.in_bounds(x, y) {
            return Err(VxError::out_of_range(x, y, self.nx, self.ny));
        }
        let n = y as usize * self.nx + x as usize;
        self.data[n] = v;
        Ok(())
    }

    pub fn set_constant(&mut self, v: f64) {
        self.data.fill(v);
    }

    fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied().filter(|v| !is_bad_data(*v))
    }

    /// Number of non-missing cells.
    pub fn valid_count(&self) -> usize {
        self.valid_values().count()
    }

    /// Minimum and maximum of the valid cells.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.valid_values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn min(&self) -> Option<f64> {
        self.data_range().map(|(lo, _)| lo)
    }

    pub fn max(&self) -> Option<f64> {
        self.data_range().map(|(_, hi)| hi)
    }

    /// Sum of the valid cells (0 when there are none).
    pub fn sum(&self) -> f64 {
        self.valid_values().sum()
    }

    /// Mean of the valid cells.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .valid_values()
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Replace every valid value by 1 where it passes `thresh`, 0 elsewhere.
    pub fn threshold(&mut self, thresh: &SingleThresh) {
        for v in self.data.iter_mut().filter(|v| !is_bad_data(**v)) {
            *v = if thresh.check(*v) { 1.0 } else { 0.0 };
        }
    }

    /// Overwrite every missing cell with `v`.
    pub fn replace_bad_data(&mut self, v: f64) {
        for cell in self.data.iter_mut().filter(|c| is_bad_data(**c)) {
            *cell = v;
        }
    }

    /// Mask of cells holding a valid, nonzero value.
    pub fn mask_plane(&self) -> MaskPlane {
        let flags = self
            .data
            .iter()
            .map(|v| !is_bad_data(*v) && *v != 0.0)
            .collect();
        MaskPlane::from_flags(self.nx, self.ny, flags)
    }

    /// Set every cell outside `mask` to missing.
    pub fn apply_mask(&mut self, mask: &MaskPlane) -> VxResult<()> {
        check_dims("apply_mask", self.dims(), mask.dims())?;
        for (v, keep) in self.data.iter_mut().zip(mask.flags()) {
            if !keep {
                *v = BAD_DATA;
            }
        }
        Ok(())
    }

    /// Set every cell that is missing in `other` to missing here as well.
    pub fn mask_bad_data(&mut self, other: &DataPlane) -> VxResult<()> {
        check_dims("mask_bad_data", self.dims(), other.dims())?;
        for (v, o) in self.data.iter_mut().zip(other.data.iter()) {
            if is_bad_data(*o) {
                *v = BAD_DATA;
            }
        }
        Ok(())
    }

    /// Cellwise `self - other`; missing where either side is missing.
    pub fn subtract(&mut self, other: &DataPlane) -> VxResult<()> {
        check_dims("subtract", self.dims(), other.dims())?;
        for (v, o) in self.data.iter_mut().zip(other.data.iter()) {
            *v = if is_bad_data(*v) || is_bad_data(*o) {
                BAD_DATA
            } else {
                *v - *o
            };
        }
        Ok(())
    }

    /// Forward difference `f(p + delta) - f(p)` along `axis`.
    ///
    /// Cells whose partner falls off the plane, or where either value is
    /// missing, are missing in the result.
    pub fn gradient(&self, axis: Axis, delta: usize) -> DataPlane {
        let mut out = DataPlane::filled(self.nx, self.ny, BAD_DATA);
        out.copy_timing(self);

        for y in 0..self.ny {
            for x in 0..self.nx {
                let (px, py) = match axis {
                    Axis::X => (x + delta, y),
                    Axis::Y => (x, y + delta),
                };
                if px >= self.nx || py >= self.ny {
                    continue;
                }
                let a = self.get(x, y);
                let b = self.get(px, py);
                if !is_bad_data(a) && !is_bad_data(b) {
                    out.set(x, y, b - a);
                }
            }
        }
        out
    }

    /// Rotate every row `n` columns to the right, wrapping around.
    ///
    /// Used to move the seam of a global grid.
    pub fn shift_right(&mut self, n: usize) {
        if self.nx == 0 {
            return;
        }
        let n = n % self.nx;
        if n == 0 {
            return;
        }
        for row in self.data.chunks_mut(self.nx) {
            row.rotate_right(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::ThreshOp;

    fn ramp(nx: usize, ny: usize) -> DataPlane {
        DataPlane::from_fn(nx, ny, |x, y| (y * nx + x) as f64)
    }

    #[test]
    fn test_layout_is_row_major() {
        let dp = ramp(4, 3);
        assert_eq!(dp.get(1, 0), 1.0);
        assert_eq!(dp.get(0, 1), 4.0);
        assert_eq!(dp.data()[2 * 4 + 3], dp.get(3, 2));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        let dp = DataPlane::new(3, 3);
        dp.get(3, 0);
    }

    #[test]
    fn test_checked_access() {
        let mut dp = DataPlane::new(2, 2);
        assert_eq!(dp.try_get(-1, 0), None);
        assert_eq!(dp.try_get(1, 1), Some(0.0));
        assert!(dp.try_set(2, 0, 1.0).is_err());
        dp.try_set(1, 0, 7.0).unwrap();
        assert_eq!(dp.get(1, 0), 7.0);
    }

    #[test]
    fn test_from_vec_checks_len() {
        assert!(DataPlane::from_vec(2, 2, vec![0.0; 3]).is_err());
        assert!(DataPlane::from_vec(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_aggregates_skip_missing() {
        let dp = DataPlane::from_vec(2, 2, vec![1.0, BAD_DATA, 3.0, f64::NAN]).unwrap();
        assert_eq!(dp.valid_count(), 2);
        assert_eq!(dp.sum(), 4.0);
        assert_eq!(dp.mean(), Some(2.0));
        assert_eq!(dp.data_range(), Some((1.0, 3.0)));

        let empty = DataPlane::filled(2, 2, BAD_DATA);
        assert_eq!(empty.mean(), None);
        assert_eq!(empty.min(), None);
        assert_eq!(empty.sum(), 0.0);
    }

    #[test]
    fn test_threshold_keeps_missing() {
        let mut dp = DataPlane::from_vec(3, 1, vec![0.2, 0.8, BAD_DATA]).unwrap();
        dp.threshold(&SingleThresh::new(ThreshOp::Gt, 0.5));
        assert_eq!(dp.data(), &[0.0, 1.0, BAD_DATA]);
    }

    #[test]
    fn test_mask_plane_and_apply_mask() {
        let mut dp = DataPlane::from_vec(2, 2, vec![0.0, 2.0, BAD_DATA, -1.0]).unwrap();
        let mask = dp.mask_plane();
        assert_eq!(mask.count_on(), 2);
        assert!(mask.get(1, 0));
        assert!(!mask.get(0, 1));

        dp.apply_mask(&mask).unwrap();
        assert_eq!(dp.data(), &[BAD_DATA, 2.0, BAD_DATA, -1.0]);

        let wrong = MaskPlane::new(3, 2);
        assert!(matches!(
            dp.apply_mask(&wrong),
            Err(VxError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_subtract_and_mask_bad_data() {
        let mut a = DataPlane::from_vec(3, 1, vec![5.0, 5.0, BAD_DATA]).unwrap();
        let b = DataPlane::from_vec(3, 1, vec![1.0, BAD_DATA, 1.0]).unwrap();
        let mut c = a.clone();

        a.subtract(&b).unwrap();
        assert_eq!(a.data(), &[4.0, BAD_DATA, BAD_DATA]);

        c.mask_bad_data(&b).unwrap();
        assert_eq!(c.data(), &[5.0, BAD_DATA, BAD_DATA]);

        assert!(a.subtract(&DataPlane::new(1, 3)).is_err());
    }

    #[test]
    fn test_gradient() {
        let dp = ramp(3, 2);
        let gx = dp.gradient(Axis::X, 1);
        assert_eq!(gx.get(0, 0), 1.0);
        assert_eq!(gx.get(2, 0), BAD_DATA);

        let gy = dp.gradient(Axis::Y, 1);
        assert_eq!(gy.get(1, 0), 3.0);
        assert_eq!(gy.get(1, 1), BAD_DATA);
    }

    #[test]
    fn test_shift_right_wraps() {
        let mut dp = ramp(4, 2);
        dp.shift_right(1);
        assert_eq!(&dp.data()[..4], &[3.0, 0.0, 1.0, 2.0]);
        assert_eq!(&dp.data()[4..], &[7.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_replace_bad_data_and_set_size() {
        let mut dp = DataPlane::from_vec(2, 1, vec![BAD_DATA, 1.0]).unwrap();
        dp.replace_bad_data(0.0);
        assert_eq!(dp.data(), &[0.0, 1.0]);

        dp.set_size(3, 3);
        assert_eq!(dp.nxy(), 9);
        assert!(dp.data().iter().all(|v| *v == 0.0));
    }
}
