//! Semi-structured grids built from explicit coordinate vectors.
//!
//! Exactly two of `lats`, `lons`, `levels` and `times` are populated; the
//! first populated vector (in that order) indexes x and the second indexes y.
//! Only a latitude/longitude pairing yields full horizontal coordinates;
//! pairings with levels or times report the missing coordinate as
//! [`BAD_DATA`].
//!
//! Fractional indices interpolate linearly between neighboring coordinates,
//! so monotonic axes round-trip at any position between their first and
//! last points. Longitude steps are taken the short way around the globe.

use serde::{Deserialize, Serialize};
use vx_common::BAD_DATA;

use crate::angles::rescale_lon;
use crate::error::{GridError, Result};
use crate::grid::GridProjection;

/// Coordinates closer than this (degrees) count as the same grid point.
const COORD_MATCH_TOL: f64 = 1.0e-5;

/// Definition of a semi-lat/lon grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemiLatLonData {
    pub name: String,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub levels: Vec<f64>,
    /// Valid times as unix seconds
    pub times: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dim {
    Lat,
    Lon,
    Level,
    Time,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemiLatLonGrid {
    data: SemiLatLonData,
    x_dim: Dim,
    y_dim: Dim,
    nx: usize,
    ny: usize,
}

impl SemiLatLonGrid {
    pub fn new(data: SemiLatLonData) -> Result<Self> {
        let dims: Vec<(Dim, usize)> = [
            (Dim::Lat, data.lats.len()),
            (Dim::Lon, data.lons.len()),
            (Dim::Level, data.levels.len()),
            (Dim::Time, data.times.len()),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();

        if dims.len() != 2 {
            return Err(GridError::invalid_parameters(format!(
                "{}: exactly two of lats, lons, levels and times must be set, found {}",
                data.name,
                dims.len()
            )));
        }

        let (x_dim, nx) = dims[0];
        let (y_dim, ny) = dims[1];
        Ok(Self {
            data,
            x_dim,
            y_dim,
            nx,
            ny,
        })
    }

    pub fn data(&self) -> &SemiLatLonData {
        &self.data
    }

    fn horizontal(&self, dim: Dim) -> Option<&[f64]> {
        match dim {
            Dim::Lat => Some(&self.data.lats),
            Dim::Lon => Some(&self.data.lons),
            _ => None,
        }
    }

    /// Value of a horizontal axis at fractional index `i`.
    fn axis_value(values: &[f64], i: f64, is_lon: bool) -> f64 {
        let last = match values.len() {
            0 => return BAD_DATA,
            n => n - 1,
        };
        if !(0.0..=last as f64).contains(&i) {
            return BAD_DATA;
        }

        let i0 = (i.floor() as usize).min(last);
        let frac = i - i0 as f64;
        if frac == 0.0 {
            return values[i0];
        }
        let v = values[i0] + frac * axis_step(values[i0], values[i0 + 1], is_lon);
        if is_lon {
            rescale_lon(v)
        } else {
            v
        }
    }

    /// Fractional index of `v` on the first axis segment containing it,
    /// falling back to a point match within [`COORD_MATCH_TOL`].
    fn axis_index(values: &[f64], v: f64, is_lon: bool) -> f64 {
        for (i, pair) in values.windows(2).enumerate() {
            let step = axis_step(pair[0], pair[1], is_lon);
            if step == 0.0 {
                continue;
            }
            let frac = axis_step(pair[0], v, is_lon) / step;
            if (0.0..=1.0).contains(&frac) {
                return i as f64 + frac;
            }
        }

        values
            .iter()
            .position(|&c| axis_step(c, v, is_lon).abs() < COORD_MATCH_TOL)
            .map_or(BAD_DATA, |i| i as f64)
    }
}

/// Signed change from `a` to `b`, the short way around for longitudes.
fn axis_step(a: f64, b: f64, is_lon: bool) -> f64 {
    if is_lon {
        rescale_lon(b - a)
    } else {
        b - a
    }
}

impl GridProjection for SemiLatLonGrid {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn nx(&self) -> usize {
        self.nx
    }

    fn ny(&self) -> usize {
        self.ny
    }

    fn xy_to_latlon(&self, x: f64, y: f64) -> (f64, f64) {
        let mut lat = BAD_DATA;
        let mut lon = BAD_DATA;
        for (dim, i) in [(self.x_dim, x), (self.y_dim, y)] {
            if let Some(values) = self.horizontal(dim) {
                let v = Self::axis_value(values, i, dim == Dim::Lon);
                match dim {
                    Dim::Lat => lat = v,
                    _ => lon = v,
                }
            }
        }
        (lat, lon)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let index = |dim: Dim| match dim {
            Dim::Lat => Self::axis_index(&self.data.lats, lat, false),
            Dim::Lon => Self::axis_index(&self.data.lons, lon, true),
            Dim::Level | Dim::Time => BAD_DATA,
        };
        (index(self.x_dim), index(self.y_dim))
    }

    fn rot_grid_to_earth(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }

    fn dump(&self) -> String {
        let d = &self.data;
        format!(
            "Projection = SemiLatLon\n\
             Name     = {}\n\
             X_Dim    = {:?}\n\
             Y_Dim    = {:?}\n\
             Nx       = {}\n\
             Ny       = {}\n\
             N_Lats   = {}\n\
             N_Lons   = {}\n\
             N_Levels = {}\n\
             N_Times  = {}\n",
            d.name,
            self.x_dim,
            self.y_dim,
            self.nx,
            self.ny,
            d.lats.len(),
            d.lons.len(),
            d.levels.len(),
            d.times.len(),
        )
    }

    fn summary(&self) -> String {
        format!(
            "Projection: SemiLatLon Nx: {} Ny: {} X_Dim: {:?} Y_Dim: {:?}",
            self.nx, self.ny, self.x_dim, self.y_dim,
        )
    }
}
