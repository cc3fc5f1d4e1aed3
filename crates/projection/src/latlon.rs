//! Uniform latitude/longitude (Plate Carree) grids.

use serde::{Deserialize, Serialize};

use crate::angles::rescale_lon;
use crate::error::{check_dimensions, GridError, Result};
use crate::grid::GridProjection;

/// Definition of a uniform lat/lon grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLonData {
    pub name: String,
    pub lat_ll: f64,
    pub lon_ll: f64,
    pub delta_lat: f64,
    pub delta_lon: f64,
    pub nx: usize,
    pub ny: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    data: LatLonData,
}

/// Longitude offset east of `origin`, in `[0, 360)`.
///
/// Offsets a rounding error short of 360 are folded back to 0 so the
/// origin column is never reported at the far end of the grid.
pub(crate) fn lon_offset_east(lon: f64, origin: f64) -> f64 {
    let d = (lon - origin).rem_euclid(360.0);
    if 360.0 - d < 1.0e-9 {
        0.0
    } else {
        d
    }
}

impl LatLonGrid {
    pub fn new(data: LatLonData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        if data.delta_lat <= 0.0 || data.delta_lon <= 0.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: grid increments must be positive",
                data.name
            )));
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &LatLonData {
        &self.data
    }
}

impl GridProjection for LatLonGrid {
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
        let lat = self.data.lat_ll + y * self.data.delta_lat;
        let lon = rescale_lon(self.data.lon_ll + x * self.data.delta_lon);
        (lat, lon)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = lon_offset_east(lon, self.data.lon_ll) / self.data.delta_lon;
        let y = (lat - self.data.lat_ll) / self.data.delta_lat;
        (x, y)
    }

    fn rot_grid_to_earth(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }

    fn is_global(&self) -> bool {
        self.data.nx as f64 * self.data.delta_lon >= 360.0 - 0.5 * self.data.delta_lon
    }

    fn dump(&self) -> String {
        let d = &self.data;
        format!(
            "Projection = Lat/Lon\n\
             Name      = {}\n\
             Lat_LL    = {:.5}\n\
             Lon_LL    = {:.5}\n\
             Delta_Lat = {:.5}\n\
             Delta_Lon = {:.5}\n\
             Nx        = {}\n\
             Ny        = {}\n",
            d.name, d.lat_ll, d.lon_ll, d.delta_lat, d.delta_lon, d.nx, d.ny,
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Lat/Lon Nx: {} Ny: {} Lat_LL: {:.3} Lon_LL: {:.3} Delta_Lat: {:.3} Delta_Lon: {:.3}",
            d.nx, d.ny, d.lat_ll, d.lon_ll, d.delta_lat, d.delta_lon,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lon_ll: f64) -> LatLonGrid {
        LatLonGrid::new(LatLonData {
            name: "ll".to_string(),
            lat_ll: 0.0,
            lon_ll,
            delta_lat: 1.0,
            delta_lon: 1.0,
            nx: 5,
            ny: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_cell_centers() {
        let g = grid(0.0);
        assert_eq!(g.xy_to_latlon(2.0, 2.0), (2.0, 2.0));
        assert_eq!(g.latlon_to_xy(2.0, 2.0), (2.0, 2.0));
        assert_eq!(g.latlon_to_xy(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_longitude_wraps_east_of_origin() {
        let g = grid(178.0);
        let (lat, lon) = g.xy_to_latlon(3.0, 0.0);
        assert_eq!(lat, 0.0);
        assert!((lon - (-179.0)).abs() < 1e-12);
        let (x, _) = g.latlon_to_xy(0.0, -179.0);
        assert!((x - 3.0).abs() < 1e-9);
        // just west of the origin lands at the far end
        let (x, _) = g.latlon_to_xy(0.0, 177.0);
        assert!((x - 359.0).abs() < 1e-9);
    }

    #[test]
    fn test_global_flag() {
        let global = LatLonGrid::new(LatLonData {
            name: "G002".to_string(),
            lat_ll: -90.0,
            lon_ll: 0.0,
            delta_lat: 2.5,
            delta_lon: 2.5,
            nx: 144,
            ny: 73,
        })
        .unwrap();
        assert!(global.is_global());
        assert!(!grid(0.0).is_global());
    }

    #[test]
    fn test_rejects_zero_increment() {
        let mut data = grid(0.0).data().clone();
        data.delta_lon = 0.0;
        assert!(LatLonGrid::new(data).is_err());
    }
}
