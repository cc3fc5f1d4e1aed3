//! Boolean selection masks.

use serde::{Deserialize, Serialize};

use crate::bad_data::{is_bad_data, BAD_DATA};
use crate::data_plane::DataPlane;
use crate::error::{check_dims, VxError, VxResult};

/// An `nx * ny` boolean field, laid out like [`DataPlane`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskPlane {
    nx: usize,
    ny: usize,
    flags: Vec<bool>,
}

impl MaskPlane {
    /// Create a mask with every cell off.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, false)
    }

    pub fn filled(nx: usize, ny: usize, on: bool) -> Self {
        Self {
            nx,
            ny,
            flags: vec![on; nx * ny],
        }
    }

    pub(crate) fn from_flags(nx: usize, ny: usize, flags: Vec<bool>) -> Self {
        debug_assert_eq!(flags.len(), nx * ny);
        Self { nx, ny, flags }
    }

    /// Wrap existing row-major flags.
    pub fn from_vec(nx: usize, ny: usize, flags: Vec<bool>) -> VxResult<Self> {
        if flags.len() != nx * ny {
            return Err(VxError::invalid_argument(format!(
                "{} flags supplied for a {}x{} mask",
                flags.len(),
                nx,
                ny
            )));
        }
        Ok(Self { nx, ny, flags })
    }

    /// Cells of `dp` that are valid and nonzero.
    pub fn from_data_plane(dp: &DataPlane) -> Self {
        dp.mask_plane()
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn flags(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().copied()
    }

    /// Flag at `(x, y)`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(
            x < self.nx && y < self.ny,
            "MaskPlane index ({}, {}) out of range for {}x{} mask",
            x,
            y,
            self.nx,
            self.ny
        );
        self.flags[y * self.nx + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        assert!(
            x < self.nx && y < self.ny,
            "MaskPlane index ({}, {}) out of range for {}x{} mask",
            x,
            y,
            self.nx,
            self.ny
        );
        self.flags[y * self.nx + x] = on;
    }

    /// Number of cells switched on.
    pub fn count_on(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn invert(&mut self) {
        for f in self.flags.iter_mut() {
            *f = !*f;
        }
    }

    /// Keep only cells on in both masks.
    pub fn intersect(&mut self, other: &MaskPlane) -> VxResult<()> {
        check_dims("intersect", self.dims(), other.dims())?;
        for (a, b) in self.flags.iter_mut().zip(other.flags.iter()) {
            *a = *a && *b;
        }
        Ok(())
    }

    /// Switch on every cell on in either mask.
    pub fn union(&mut self, other: &MaskPlane) -> VxResult<()> {
        check_dims("union", self.dims(), other.dims())?;
        for (a, b) in self.flags.iter_mut().zip(other.flags.iter()) {
            *a = *a || *b;
        }
        Ok(())
    }

    /// 1.0 where on, 0.0 where off.
    pub fn to_data_plane(&self) -> DataPlane {
        let values = self.flags.iter().map(|f| if *f { 1.0 } else { 0.0 });
        let mut dp = DataPlane::new(self.nx, self.ny);
        for (cell, v) in dp.data_mut().iter_mut().zip(values) {
            *cell = v;
        }
        dp
    }

    /// Switch off every cell that is missing in `dp`.
    pub fn exclude_bad_data(&mut self, dp: &DataPlane) -> VxResult<()> {
        check_dims("exclude_bad_data", self.dims(), dp.dims())?;
        for (f, v) in self.flags.iter_mut().zip(dp.data()) {
            if is_bad_data(*v) {
                *f = false;
            }
        }
        Ok(())
    }
}

impl DataPlane {
    /// 1.0 inside `mask`, missing outside.
    pub fn from_mask_missing_outside(mask: &MaskPlane) -> DataPlane {
        let mut dp = mask.to_data_plane();
        for (cell, on) in dp.data_mut().iter_mut().zip(mask.flags()) {
            if !on {
                *cell = BAD_DATA;
            }
        }
        dp
    }
}
