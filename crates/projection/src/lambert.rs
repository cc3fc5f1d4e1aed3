//! Lambert Conformal Conic projection.
//!
//! The grid is defined by one or two standard parallels, an orientation
//! longitude along which grid north points to true north, and a pin point:
//! a lat/lon whose grid coordinates are fixed. Spacing is given in km at the
//! first standard parallel.
//!
//! Southern hemisphere grids are folded onto the northern case: latitudes
//! and longitude offsets flip sign before the cone formulas run, and flip
//! back afterwards.

use serde::{Deserialize, Serialize};

use crate::angles::{atan2d, atand, cosd, rescale_lon, sind, tand, Hemisphere};
use crate::error::{check_dimensions, GridError, Result};
use crate::grid::GridProjection;

/// Parallels closer than this are treated as a tangent cone.
const TANGENT_CONE_TOL: f64 = 1.0e-5;

/// Definition of a Lambert Conformal grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambertData {
    pub name: String,
    pub hemisphere: Hemisphere,
    /// First standard parallel (degrees)
    pub scale_lat_1: f64,
    /// Second standard parallel (degrees), equal to the first for a tangent cone
    pub scale_lat_2: f64,
    pub lat_pin: f64,
    pub lon_pin: f64,
    pub x_pin: f64,
    pub y_pin: f64,
    /// Orientation longitude (degrees)
    pub lon_orient: f64,
    /// Grid spacing (km)
    pub d_km: f64,
    /// Earth radius (km)
    pub r_km: f64,
    pub nx: usize,
    pub ny: usize,
}

/// Plane geometry shared by the conic and polar stereographic grids.
///
/// `r(lat) = tan(45 - lat/2)^n` on the folded latitude, and
/// `x = bx + alpha * r * sin(theta)`, `y = by - alpha * r * cos(theta)`
/// with `theta = h * n * (lon - lon_orient)`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConicCore {
    h: f64,
    n: f64,
    alpha: f64,
    lon_orient: f64,
    bx: f64,
    by: f64,
}

impl ConicCore {
    /// Build the core and place `(lat_pin, lon_pin)` at `(x_pin, y_pin)`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        hemisphere: Hemisphere,
        n: f64,
        alpha: f64,
        lon_orient: f64,
        lat_pin: f64,
        lon_pin: f64,
        x_pin: f64,
        y_pin: f64,
    ) -> Self {
        let mut core = Self {
            h: hemisphere.sign(),
            n,
            alpha,
            lon_orient: rescale_lon(lon_orient),
            bx: 0.0,
            by: 0.0,
        };

        let r0 = core.r_of_lat(lat_pin);
        let theta0 = core.theta_of_lon(lon_pin);
        core.bx = x_pin - alpha * r0 * sind(theta0);
        core.by = y_pin + alpha * r0 * cosd(theta0);
        core
    }

    #[inline]
    fn r_of_lat(&self, lat: f64) -> f64 {
        tand(45.0 - 0.5 * self.h * lat).powf(self.n)
    }

    #[inline]
    fn theta_of_lon(&self, lon: f64) -> f64 {
        self.h * self.n * rescale_lon(lon - self.lon_orient)
    }

    pub(crate) fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let r = self.r_of_lat(lat);
        let theta = self.theta_of_lon(lon);
        let x = self.bx + self.alpha * r * sind(theta);
        let y = self.by - self.alpha * r * cosd(theta);
        (x, y)
    }

    pub(crate) fn xy_to_latlon(&self, x: f64, y: f64) -> (f64, f64) {
        let u = (x - self.bx) / self.alpha;
        let v = (y - self.by) / self.alpha;
        let r = (u * u + v * v).sqrt();

        let folded_lat = 90.0 - 2.0 * atand(r.powf(1.0 / self.n));
        // atan2(u, -v), not atan2(v, u): theta is measured from grid "down"
        let theta = if r < 1.0e-5 { 0.0 } else { atan2d(u, -v) };

        let lat = self.h * folded_lat;
        let lon = rescale_lon(self.lon_orient + self.h * theta / self.n);
        (lat, lon)
    }

    /// Angle (degrees) from grid-relative to earth-relative vectors at `lon`.
    pub(crate) fn rotation_at(&self, lon: f64) -> f64 {
        self.theta_of_lon(lon)
    }

    pub(crate) fn cone_constant(&self) -> f64 {
        self.n
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn offsets(&self) -> (f64, f64) {
        (self.bx, self.by)
    }
}

/// A Lambert Conformal grid ready for coordinate transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertGrid {
    data: LambertData,
    core: ConicCore,
}

impl LambertGrid {
    /// Create a Lambert grid, validating its parameters.
    pub fn new(data: LambertData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        if data.d_km <= 0.0 || data.r_km <= 0.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: grid spacing and earth radius must be positive",
                data.name
            )));
        }

        let h = data.hemisphere.sign();
        let lat1 = h * data.scale_lat_1;
        let lat2 = h * data.scale_lat_2;
        if lat1 <= 0.0 || lat2 <= 0.0 || lat1 > 90.0 || lat2 > 90.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: standard parallels {} and {} must lie in the {:?} hemisphere",
                data.name, data.scale_lat_1, data.scale_lat_2, data.hemisphere
            )));
        }

        let n = if (lat1 - lat2).abs() < TANGENT_CONE_TOL {
            sind(lat1)
        } else {
            (cosd(lat1) / cosd(lat2)).ln() / (tand(45.0 - 0.5 * lat1) / tand(45.0 - 0.5 * lat2)).ln()
        };

        let alpha = cosd(lat1) / (n * tand(45.0 - 0.5 * lat1).powf(n)) * (data.r_km / data.d_km);

        let core = ConicCore::new(
            data.hemisphere,
            n,
            alpha,
            data.lon_orient,
            data.lat_pin,
            data.lon_pin,
            data.x_pin,
            data.y_pin,
        );

        tracing::debug!(
            grid = %data.name,
            cone = n,
            alpha = alpha,
            "built Lambert conformal grid"
        );

        Ok(Self { data, core })
    }

    pub fn data(&self) -> &LambertData {
        &self.data
    }

    /// Cone constant `n`.
    pub fn cone_constant(&self) -> f64 {
        self.core.cone_constant()
    }
}

impl GridProjection for LambertGrid {
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
            "Projection = Lambert Conformal\n\
             Name       = {}\n\
             Hemisphere = {:?}\n\
             Scale_Lat_1 = {:.5}\n\
             Scale_Lat_2 = {:.5}\n\
             Lat_pin    = {:.5}\n\
             Lon_pin    = {:.5}\n\
             X_pin      = {:.5}\n\
             Y_pin      = {:.5}\n\
             Lon_orient = {:.5}\n\
             D_km       = {:.5}\n\
             R_km       = {:.5}\n\
             Nx         = {}\n\
             Ny         = {}\n\
             Cone       = {:.5}\n\
             Alpha      = {:.5}\n\
             Bx         = {:.5}\n\
             By         = {:.5}\n",
            d.name,
            d.hemisphere,
            d.scale_lat_1,
            d.scale_lat_2,
            d.lat_pin,
            d.lon_pin,
            d.x_pin,
            d.y_pin,
            d.lon_orient,
            d.d_km,
            d.r_km,
            d.nx,
            d.ny,
            self.core.cone_constant(),
            self.core.alpha(),
            bx,
            by,
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Lambert Conformal Nx: {} Ny: {} Hemisphere: {} Lat_pin: {:.3} Lon_pin: {:.3} \
             X_pin: {:.3} Y_pin: {:.3} Lon_orient: {:.3} Scale_Lat_1: {:.3} Scale_Lat_2: {:.3} \
             D_km: {:.3} R_km: {:.3}",
            d.nx,
            d.ny,
            d.hemisphere.flag(),
            d.lat_pin,
            d.lon_pin,
            d.x_pin,
            d.y_pin,
            d.lon_orient,
            d.scale_lat_1,
            d.scale_lat_2,
            d.d_km,
            d.r_km,
        )
    }
}
