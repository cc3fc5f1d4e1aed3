//! Gaussian filtering.
//!
//! The filter width is expressed as a physical radius and a grid spacing,
//! both in kilometers. `sigma = radius / dx` grid cells and the kernel is
//! truncated at `round(sigma * trunc_factor)` cells.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vx_common::{is_bad_data, DataPlane, BAD_DATA};

use crate::error::{ProcessorError, Result};

/// Gaussian filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianInfo {
    /// Radius of influence in km.
    pub radius_km: f64,
    /// Grid spacing in km.
    pub dx_km: f64,
    /// Kernel truncation in units of sigma.
    pub trunc_factor: f64,
}

impl Default for GaussianInfo {
    fn default() -> Self {
        Self {
            radius_km: 120.0,
            dx_km: 81.271,
            trunc_factor: 3.5,
        }
    }
}

impl GaussianInfo {
    pub fn new(radius_km: f64, dx_km: f64, trunc_factor: f64) -> Self {
        Self {
            radius_km,
            dx_km,
            trunc_factor,
        }
    }

    /// Standard deviation in grid cells.
    pub fn sigma(&self) -> f64 {
        self.radius_km / self.dx_km
    }

    /// Kernel half-width in grid cells.
    pub fn max_r(&self) -> Result<usize> {
        let sigma = self.sigma();
        let max_r = (sigma * self.trunc_factor).round();
        if !max_r.is_finite() || max_r <= 0.0 {
            return Err(ProcessorError::config(format!(
                "gaussian radius {} km, dx {} km and truncation {} give an empty kernel",
                self.radius_km, self.dx_km, self.trunc_factor
            )));
        }
        Ok(max_r as usize)
    }

    /// Unnormalized 1-D kernel of length `2 * max_r + 1`, centered.
    pub fn weights_1d(&self) -> Result<Vec<f64>> {
        let max_r = self.max_r()? as i64;
        let two_s2 = 2.0 * self.sigma().powi(2);
        Ok((-max_r..=max_r)
            .map(|k| (-((k * k) as f64) / two_s2).exp())
            .collect())
    }

    /// 2-D kernel on a `(2 * max_r + 1)` square, zero beyond `max_r` cells
    /// from the center.
    pub fn weights_2d(&self) -> Result<DataPlane> {
        let max_r = self.max_r()?;
        let n = 2 * max_r + 1;
        let r = max_r as f64;
        let sigma2 = self.sigma().powi(2);
        let norm = 1.0 / (2.0 * std::f64::consts::PI * sigma2);

        Ok(DataPlane::from_fn(n, n, |x, y| {
            let dx = x as f64 - r;
            let dy = y as f64 - r;
            let d2 = dx * dx + dy * dy;
            if d2.sqrt() > r {
                0.0
            } else {
                norm * (-d2 / (2.0 * sigma2)).exp()
            }
        }))
    }
}

/// Apply the separable Gaussian filter, along x and then along y.
///
/// Each pass renormalizes over the valid cells under the kernel. A cell is
/// missing when no valid value is found or when the valid fraction of the
/// in-grid kernel cells is below `vld_thresh`.
pub fn apply_gaussian(
    dp: &DataPlane,
    info: &GaussianInfo,
    wrap_lon: bool,
    vld_thresh: f64,
) -> Result<DataPlane> {
    let weights = info.weights_1d()?;
    debug!(
        sigma = info.sigma(),
        max_r = weights.len() / 2,
        wrap_lon,
        "Applying gaussian filter"
    );

    if dp.is_empty() {
        return Ok(dp.clone());
    }

    let along_x = filter_pass(dp, &weights, Pass::X { wrap_lon }, vld_thresh);
    Ok(filter_pass(&along_x, &weights, Pass::Y, vld_thresh))
}

#[derive(Clone, Copy)]
enum Pass {
    X { wrap_lon: bool },
    Y,
}

fn filter_pass(src: &DataPlane, weights: &[f64], pass: Pass, vld_thresh: f64) -> DataPlane {
    let nx = src.nx();
    let max_r = (weights.len() / 2) as i64;
    let mut out = src.clone();

    out.data_mut()
        .par_chunks_mut(nx)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut count = 0usize;
                let mut count_vld = 0usize;
                let mut value_sum = 0.0;
                let mut weight_sum = 0.0;

                for (i, &w) in weights.iter().enumerate() {
                    let k = i as i64 - max_r;
                    let (ix, iy) = match pass {
                        Pass::X { wrap_lon } => {
                            let ix = x as i64 + k;
                            let ix = if wrap_lon { ix.rem_euclid(nx as i64) } else { ix };
                            (ix, y as i64)
                        }
                        Pass::Y => (x as i64, y as i64 + k),
                    };
                    let Some(v) = src.try_get(ix, iy) else {
                        continue;
                    };
                    count += 1;
                    if is_bad_data(v) {
                        continue;
                    }
                    count_vld += 1;
                    value_sum += w * v;
                    weight_sum += w;
                }

                *cell = if count == 0
                    || count_vld == 0
                    || (count_vld as f64 / count as f64) < vld_thresh
                {
                    BAD_DATA
                } else {
                    value_sum / weight_sum
                };
            }
        });

    out
}

/// Gaussian-weighted value at an arbitrary point using the 2-D kernel.
///
/// `weights` is the plane returned by [`GaussianInfo::weights_2d`].
pub fn interp_gaussian(
    dp: &DataPlane,
    weights: &DataPlane,
    obs_x: f64,
    obs_y: f64,
    vld_thresh: f64,
) -> f64 {
    let x = obs_x.round() as i64;
    let y = obs_y.round() as i64;
    let max_r = (weights.nx() / 2) as i64;

    let mut count = 0usize;
    let mut count_vld = 0usize;
    let mut value_sum = 0.0;
    let mut weight_sum = 0.0;

    for wy in 0..weights.ny() {
        for wx in 0..weights.nx() {
            let weight = weights.get(wx, wy);
            if weight <= 0.0 {
                continue;
            }
            let Some(v) = dp.try_get(x - max_r + wx as i64, y - max_r + wy as i64) else {
                continue;
            };
            count += 1;
            if is_bad_data(v) {
                continue;
            }
            count_vld += 1;
            value_sum += v * weight;
            weight_sum += weight;
        }
    }

    if count == 0 || count_vld == 0 || (count_vld as f64 / count as f64) < vld_thresh {
        BAD_DATA
    } else {
        value_sum / weight_sum
    }
}
