//! Gaussian (spectral model transform) grids.
//!
//! Latitudes are the roots of the Legendre polynomial of degree `ny`,
//! ordered south to north; longitudes are uniform with spacing `360 / nx`
//! starting at `lon_zero`.

use serde::{Deserialize, Serialize};

use crate::angles::{rescale_lon, DEG_PER_RAD};
use crate::error::{check_dimensions, Result};
use crate::grid::GridProjection;
use crate::latlon::lon_offset_east;

/// Definition of a Gaussian grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianData {
    pub name: String,
    pub lon_zero: f64,
    pub nx: usize,
    pub ny: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianGrid {
    data: GaussianData,
    delta_lon: f64,
    /// Gaussian latitudes, ascending.
    latitudes: Vec<f64>,
}

/// Roots of `P_n(sin(lat))`, returned as latitudes in degrees, south first.
pub fn gaussian_latitudes(n: usize) -> Vec<f64> {
    let nf = n as f64;
    let mut lats = Vec::with_capacity(n);

    for i in 1..=n {
        // Tricomi's estimate of the i-th root of P_n, refined by Newton steps
        let mut z = (std::f64::consts::PI * (i as f64 - 0.25) / (nf + 0.5)).cos();
        for _ in 0..100 {
            let mut p1 = 1.0;
            let mut p2 = 0.0;
            for j in 1..=n {
                let p3 = p2;
                p2 = p1;
                let jf = j as f64;
                p1 = ((2.0 * jf - 1.0) * z * p2 - (jf - 1.0) * p3) / jf;
            }
            let dp = nf * (z * p1 - p2) / (z * z - 1.0);
            let z_prev = z;
            z = z_prev - p1 / dp;
            if (z - z_prev).abs() < 1.0e-15 {
                break;
            }
        }
        lats.push(z.clamp(-1.0, 1.0).asin() * DEG_PER_RAD);
    }

    // roots come out north to south
    lats.reverse();
    lats
}

impl GaussianGrid {
    pub fn new(data: GaussianData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        let delta_lon = 360.0 / data.nx as f64;
        let latitudes = gaussian_latitudes(data.ny);
        tracing::debug!(grid = %data.name, ny = data.ny, "computed Gaussian latitudes");
        Ok(Self {
            data,
            delta_lon,
            latitudes,
        })
    }

    pub fn data(&self) -> &GaussianData {
        &self.data
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    /// Segment `[i, i + 1]` used to interpolate around row `y`.
    fn segment_for_y(&self, y: f64) -> usize {
        let last = self.latitudes.len() - 2;
        (y.floor().max(0.0) as usize).min(last)
    }

    /// Segment `[i, i + 1]` bracketing `lat`, clamped to the end segments.
    fn segment_for_lat(&self, lat: f64) -> usize {
        let last = self.latitudes.len() - 2;
        let above = self.latitudes.partition_point(|l| *l <= lat);
        above.saturating_sub(1).min(last)
    }
}

impl GridProjection for GaussianGrid {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn nx(&self) -> usize {
        self.data.nx
    }

    fn ny(&self) -> usize {
        self.data.ny
    }

    fn xy_to_latlon(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = rescale_lon(self.data.lon_zero + x * self.delta_lon);
        if self.latitudes.len() == 1 {
            return (self.latitudes[0], lon);
        }
        let i = self.segment_for_y(y);
        let (a, b) = (self.latitudes[i], self.latitudes[i + 1]);
        let lat = a + (y - i as f64) * (b - a);
        (lat, lon)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = lon_offset_east(lon, self.data.lon_zero) / self.delta_lon;
        if self.latitudes.len() == 1 {
            return (x, 0.0);
        }
        let i = self.segment_for_lat(lat);
        let (a, b) = (self.latitudes[i], self.latitudes[i + 1]);
        let y = i as f64 + (lat - a) / (b - a);
        (x, y)
    }

    fn rot_grid_to_earth(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }

    fn is_global(&self) -> bool {
        true
    }

    fn dump(&self) -> String {
        let d = &self.data;
        format!(
            "Projection = Gaussian\n\
             Name      = {}\n\
             Lon_Zero  = {:.5}\n\
             Delta_Lon = {:.5}\n\
             Nx        = {}\n\
             Ny        = {}\n\
             Lat_South = {:.5}\n\
             Lat_North = {:.5}\n",
            d.name,
            d.lon_zero,
            self.delta_lon,
            d.nx,
            d.ny,
            self.latitudes[0],
            self.latitudes[self.latitudes.len() - 1],
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Gaussian Nx: {} Ny: {} Lon_Zero: {:.3}",
            d.nx, d.ny, d.lon_zero,
        )
    }
}
