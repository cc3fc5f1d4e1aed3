//! Polar Stereographic projection.
//!
//! A stereographic grid is the conic geometry with cone constant 1 and a
//! single true-scale latitude.

use serde::{Deserialize, Serialize};

use crate::angles::{sind, Hemisphere};
use crate::error::{check_dimensions, GridError, Result};
use crate::grid::GridProjection;
use crate::lambert::ConicCore;

/// Definition of a polar stereographic grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereographicData {
    pub name: String,
    pub hemisphere: Hemisphere,
    /// Latitude where the grid spacing is true (degrees)
    pub scale_lat: f64,
    pub lat_pin: f64,
    pub lon_pin: f64,
    pub x_pin: f64,
    pub y_pin: f64,
    pub lon_orient: f64,
    pub d_km: f64,
    pub r_km: f64,
    pub nx: usize,
    pub ny: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StereographicGrid {
    data: StereographicData,
    core: ConicCore,
}

impl StereographicGrid {
    pub fn new(data: StereographicData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        if data.d_km <= 0.0 || data.r_km <= 0.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: grid spacing and earth radius must be positive",
                data.name
            )));
        }

        let alpha = (1.0 + sind(data.scale_lat.abs())) * (data.r_km / data.d_km);
        let core = ConicCore::new(
            data.hemisphere,
            1.0,
            alpha,
            data.lon_orient,
            data.lat_pin,
            data.lon_pin,
            data.x_pin,
            data.y_pin,
        );

        tracing::debug!(grid = %data.name, alpha = alpha, "built polar stereographic grid");

        Ok(Self { data, core })
    }

    pub fn data(&self) -> &StereographicData {
        &self.data
    }
}

impl GridProjection for StereographicGrid {
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
        self.core.xy_to_latlon(x, y)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        self.core.latlon_to_xy(lat, lon)
    }

    fn rot_grid_to_earth(&self, x: f64, y: f64) -> f64 {
        let (_, lon) = self.core.xy_to_latlon(x, y);
        self.core.rotation_at(lon)
    }

    fn dump(&self) -> String {
        let d = &self.data;
        let (bx, by) = self.core.offsets();
        format!(
            "Projection = Polar Stereographic\n\
             Name       = {}\n\
             Hemisphere = {:?}\n\
             Scale_Lat  = {:.5}\n\
             Lat_pin    = {:.5}\n\
             Lon_pin    = {:.5}\n\
             X_pin      = {:.5}\n\
             Y_pin      = {:.5}\n\
             Lon_orient = {:.5}\n\
             D_km       = {:.5}\n\
             R_km       = {:.5}\n\
             Nx         = {}\n\
             Ny         = {}\n\
             Alpha      = {:.5}\n\
             Bx         = {:.5}\n\
             By         = {:.5}\n",
            d.name,
            d.hemisphere,
            d.scale_lat,
            d.lat_pin,
            d.lon_pin,
            d.x_pin,
            d.y_pin,
            d.lon_orient,
            d.d_km,
            d.r_km,
            d.nx,
            d.ny,
            self.core.alpha(),
            bx,
            by,
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Stereographic Nx: {} Ny: {} Hemisphere: {} Lat_pin: {:.3} Lon_pin: {:.3} \
             X_pin: {:.3} Y_pin: {:.3} Lon_orient: {:.3} Scale_Lat: {:.3} D_km: {:.3} R_km: {:.3}",
            d.nx,
            d.ny,
            d.hemisphere.flag(),
            d.lat_pin,
            d.lon_pin,
            d.x_pin,
            d.y_pin,
            d.lon_orient,
            d.scale_lat,
            d.d_km,
            d.r_km,
        )
    }
}
