//! Mercator projection.
//!
//! Defined by its lower-left and upper-right corners. Longitude is measured
//! eastward from the lower-left corner, so grids may straddle the
//! antimeridian; equal corner longitudes describe a full 360 degree grid.
//!
//! On such a closed grid the last column repeats the first, so
//! `latlon_to_xy` maps points on it back to `x = 0` rather than
//! `x = nx - 1`.

use serde::{Deserialize, Serialize};

use crate::angles::{atand, rescale_lon, tand, RAD_PER_DEG};
use crate::error::{check_dimensions, GridError, Result};
use crate::grid::GridProjection;

/// Corner longitudes closer than this (degrees) wrap the whole globe.
const FULL_CIRCLE_TOL: f64 = 1.0e-2;

/// Slack for longitudes that land a rounding error west of `lon_ll`.
const LON_TOL: f64 = 1.0e-9;

/// Definition of a Mercator grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MercatorData {
    pub name: String,
    pub lat_ll: f64,
    pub lon_ll: f64,
    pub lat_ur: f64,
    pub lon_ur: f64,
    pub nx: usize,
    pub ny: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MercatorGrid {
    data: MercatorData,
    /// Lower-left longitude in [-180, 180)
    lon_ll: f64,
    /// Upper-right longitude, strictly east of `lon_ll`
    lon_ur: f64,
    mx: f64,
    bx: f64,
    my: f64,
    by: f64,
}

#[inline]
fn merc_y(lat: f64) -> f64 {
    tand(45.0 + 0.5 * lat).ln()
}

impl MercatorGrid {
    pub fn new(data: MercatorData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        if data.lat_ll >= data.lat_ur || data.lat_ll <= -90.0 || data.lat_ur >= 90.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: corner latitudes {} and {} must satisfy -90 < lat_ll < lat_ur < 90",
                data.name, data.lat_ll, data.lat_ur
            )));
        }

        let lon_ll = rescale_lon(data.lon_ll);
        let mut lon_ur = rescale_lon(data.lon_ur);
        if (lon_ur - lon_ll).abs() < FULL_CIRCLE_TOL {
            lon_ur = lon_ll + 360.0;
        } else if lon_ur < lon_ll {
            lon_ur += 360.0;
        }

        let lambda_ll = lon_ll * RAD_PER_DEG;
        let lambda_ur = lon_ur * RAD_PER_DEG;
        let mx = (data.nx as f64 - 1.0) / (lambda_ur - lambda_ll);
        let bx = -mx * lambda_ll;

        let v_ll = merc_y(data.lat_ll);
        let v_ur = merc_y(data.lat_ur);
        let my = (data.ny as f64 - 1.0) / (v_ur - v_ll);
        let by = -my * v_ll;

        Ok(Self {
            data,
            lon_ll,
            lon_ur,
            mx,
            bx,
            my,
            by,
        })
    }

    pub fn data(&self) -> &MercatorData {
        &self.data
    }

    /// Longitude reduced into `[lon_ll, lon_ll + 360)`.
    fn unwrap_lon(&self, lon: f64) -> f64 {
        let mut l = rescale_lon(lon);
        if l < self.lon_ll - LON_TOL {
            l += 360.0;
        }
        l
    }
}

impl GridProjection for MercatorGrid {
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
        let lambda = (x - self.bx) / self.mx;
        let v = (y - self.by) / self.my;
        let lat = 2.0 * atand(v.exp()) - 90.0;
        let lon = rescale_lon(lambda / RAD_PER_DEG);
        (lat, lon)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lambda = self.unwrap_lon(lon) * RAD_PER_DEG;
        let x = self.mx * lambda + self.bx;
        let y = self.my * merc_y(lat) + self.by;
        (x, y)
    }

    fn rot_grid_to_earth(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }

    fn is_global(&self) -> bool {
        self.lon_ur - self.lon_ll >= 360.0 - FULL_CIRCLE_TOL
    }

    fn dump(&self) -> String {
        let d = &self.data;
        format!(
            "Projection = Mercator\n\
             Name   = {}\n\
             Lat_LL = {:.5}\n\
             Lon_LL = {:.5}\n\
             Lat_UR = {:.5}\n\
             Lon_UR = {:.5}\n\
             Nx     = {}\n\
             Ny     = {}\n\
             Mx     = {:.5}\n\
             My     = {:.5}\n\
             Bx     = {:.5}\n\
             By     = {:.5}\n",
            d.name,
            d.lat_ll,
            self.lon_ll,
            d.lat_ur,
            self.lon_ur,
            d.nx,
            d.ny,
            self.mx,
            self.my,
            self.bx,
            self.by,
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Mercator Nx: {} Ny: {} Lat_LL: {:.3} Lon_LL: {:.3} Lat_UR: {:.3} Lon_UR: {:.3}",
            d.nx, d.ny, d.lat_ll, d.lon_ll, d.lat_ur, d.lon_ur,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lon_ll: f64, lon_ur: f64) -> MercatorGrid {
        MercatorGrid::new(MercatorData {
            name: "merc".to_string(),
            lat_ll: -25.0,
            lon_ll,
            lat_ur: 60.644,
            lon_ur,
            nx: 93,
            ny: 68,
        })
        .unwrap()
    }

    #[test]
    fn test_corners() {
        let g = grid(110.0, -109.129);
        let (x, y) = g.latlon_to_xy(-25.0, 110.0);
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);

        let (x, y) = g.latlon_to_xy(60.644, -109.129);
        assert!((x - 92.0).abs() < 1e-9, "x = {}", x);
        assert!((y - 67.0).abs() < 1e-9, "y = {}", y);
    }

    #[test]
    fn test_roundtrip_across_antimeridian() {
        let g = grid(110.0, -109.129);
        for &(x, y) in &[(0.0, 0.0), (46.0, 30.0), (92.0, 67.0), (70.5, 3.25)] {
            let (lat, lon) = g.xy_to_latlon(x, y);
            let (x2, y2) = g.latlon_to_xy(lat, lon);
            assert!((x - x2).abs() < 1e-6, "x: {} vs {}", x, x2);
            assert!((y - y2).abs() < 1e-6, "y: {} vs {}", y, y2);
        }
        // 180E is inside the grid
        let (x, _) = g.latlon_to_xy(0.0, 180.0);
        assert!(x > 0.0 && x < 92.0);
    }

    #[test]
    fn test_equal_corner_longitudes_wrap_globe() {
        let g = grid(0.0, 0.0);
        assert!(g.is_global());
        let (x, _) = g.latlon_to_xy(0.0, 180.0);
        assert!((x - 46.0).abs() < 1e-9);
        assert_eq!(g.rot_grid_to_earth(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_rejects_inverted_latitudes() {
        let result = MercatorGrid::new(MercatorData {
            name: "bad".to_string(),
            lat_ll: 10.0,
            lon_ll: 0.0,
            lat_ur: 5.0,
            lon_ur: 10.0,
            nx: 10,
            ny: 10,
        });
        assert!(result.is_err());
    }
}
