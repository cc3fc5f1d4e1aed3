//! Rotated latitude/longitude grids.
//!
//! The grid is uniform in a rotated spherical coordinate system whose south
//! pole sits at `(true_lat_south_pole, true_lon_south_pole)`, optionally
//! spun by `aux_rotation` degrees about the new polar axis. The mapping
//! between true and rotated coordinates is a single 3x3 rotation applied to
//! unit vectors on the sphere.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::angles::{atan2d, cosd, rescale_lon, sind, DEG_PER_RAD, RAD_PER_DEG};
use crate::error::{check_dimensions, GridError, Result};
use crate::grid::GridProjection;
use crate::latlon::{LatLonData, LatLonGrid};

/// Definition of a rotated lat/lon grid. Longitudes are degrees east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatedLatLonData {
    pub name: String,
    /// Lower-left latitude in the rotated system
    pub rot_lat_ll: f64,
    /// Lower-left longitude in the rotated system
    pub rot_lon_ll: f64,
    pub delta_rot_lat: f64,
    pub delta_rot_lon: f64,
    pub nx: usize,
    pub ny: usize,
    pub true_lat_south_pole: f64,
    pub true_lon_south_pole: f64,
    pub aux_rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotatedLatLonGrid {
    data: RotatedLatLonData,
    /// Uniform grid in rotated coordinates.
    plane: LatLonGrid,
    /// True -> rotated.
    to_rotated: Rotation3<f64>,
    /// Rotated -> true.
    to_true: Rotation3<f64>,
}

fn unit_vector(lat: f64, lon: f64) -> Vector3<f64> {
    Vector3::new(cosd(lat) * cosd(lon), cosd(lat) * sind(lon), sind(lat))
}

fn vector_latlon(v: &Vector3<f64>) -> (f64, f64) {
    let lat = v.z.clamp(-1.0, 1.0).asin() * DEG_PER_RAD;
    let lon = if v.x.abs() < 1e-15 && v.y.abs() < 1e-15 {
        0.0
    } else {
        atan2d(v.y, v.x)
    };
    (lat, rescale_lon(lon))
}

/// Local north unit vector at `(lat, lon)`.
fn north_tangent(lat: f64, lon: f64) -> Vector3<f64> {
    Vector3::new(-sind(lat) * cosd(lon), -sind(lat) * sind(lon), cosd(lat))
}

/// Local east unit vector at `lon`.
fn east_tangent(lon: f64) -> Vector3<f64> {
    Vector3::new(-sind(lon), cosd(lon), 0.0)
}

impl RotatedLatLonGrid {
    pub fn new(data: RotatedLatLonData) -> Result<Self> {
        check_dimensions(data.nx, data.ny)?;
        if data.true_lat_south_pole.abs() > 90.0 {
            return Err(GridError::invalid_parameters(format!(
                "{}: south pole latitude {} out of range",
                data.name, data.true_lat_south_pole
            )));
        }

        let plane = LatLonGrid::new(LatLonData {
            name: data.name.clone(),
            lat_ll: data.rot_lat_ll,
            lon_ll: data.rot_lon_ll,
            delta_lat: data.delta_rot_lat,
            delta_lon: data.delta_rot_lon,
            nx: data.nx,
            ny: data.ny,
        })?;

        // Spin the south pole's meridian to 0, tilt the pole onto -z, then
        // apply the auxiliary spin about the new polar axis.
        let z = Vector3::z_axis();
        let y = Vector3::y_axis();
        let to_rotated = Rotation3::from_axis_angle(&z, -data.aux_rotation * RAD_PER_DEG)
            * Rotation3::from_axis_angle(&y, (90.0 + data.true_lat_south_pole) * RAD_PER_DEG)
            * Rotation3::from_axis_angle(&z, -data.true_lon_south_pole * RAD_PER_DEG);
        let to_true = to_rotated.inverse();

        Ok(Self {
            data,
            plane,
            to_rotated,
            to_true,
        })
    }

    pub fn data(&self) -> &RotatedLatLonData {
        &self.data
    }

    /// Convert true coordinates to rotated coordinates.
    pub fn true_to_rotated(&self, lat: f64, lon: f64) -> (f64, f64) {
        vector_latlon(&(self.to_rotated * unit_vector(lat, lon)))
    }

    /// Convert rotated coordinates to true coordinates.
    pub fn rotated_to_true(&self, rlat: f64, rlon: f64) -> (f64, f64) {
        vector_latlon(&(self.to_true * unit_vector(rlat, rlon)))
    }
}

impl GridProjection for RotatedLatLonGrid {
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
        let (rlat, rlon) = self.plane.xy_to_latlon(x, y);
        self.rotated_to_true(rlat, rlon)
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (rlat, rlon) = self.true_to_rotated(lat, lon);
        self.plane.latlon_to_xy(rlat, rlon)
    }

    /// Bearing of rotated north, clockwise from true north.
    fn rot_grid_to_earth(&self, x: f64, y: f64) -> f64 {
        let (rlat, rlon) = self.plane.xy_to_latlon(x, y);
        let (lat, lon) = self.rotated_to_true(rlat, rlon);

        let grid_north = self.to_true * north_tangent(rlat, rlon);
        let east = east_tangent(lon);
        let north = north_tangent(lat, lon);
        atan2d(grid_north.dot(&east), grid_north.dot(&north))
    }

    fn dump(&self) -> String {
        let d = &self.data;
        format!(
            "Projection = Rotated Lat/Lon\n\
             Name                = {}\n\
             Rot_Lat_LL          = {:.5}\n\
             Rot_Lon_LL          = {:.5}\n\
             Delta_Rot_Lat       = {:.5}\n\
             Delta_Rot_Lon       = {:.5}\n\
             Nx                  = {}\n\
             Ny                  = {}\n\
             True_Lat_South_Pole = {:.5}\n\
             True_Lon_South_Pole = {:.5}\n\
             Aux_Rotation        = {:.5}\n",
            d.name,
            d.rot_lat_ll,
            d.rot_lon_ll,
            d.delta_rot_lat,
            d.delta_rot_lon,
            d.nx,
            d.ny,
            d.true_lat_south_pole,
            d.true_lon_south_pole,
            d.aux_rotation,
        )
    }

    fn summary(&self) -> String {
        let d = &self.data;
        format!(
            "Projection: Rotated Lat/Lon Nx: {} Ny: {} Rot_Lat_LL: {:.3} Rot_Lon_LL: {:.3} \
             Delta_Rot_Lat: {:.3} Delta_Rot_Lon: {:.3} True_Lat_South_Pole: {:.3} \
             True_Lon_South_Pole: {:.3} Aux_Rotation: {:.3}",
            d.nx,
            d.ny,
            d.rot_lat_ll,
            d.rot_lon_ll,
            d.delta_rot_lat,
            d.delta_rot_lon,
            d.true_lat_south_pole,
            d.true_lon_south_pole,
            d.aux_rotation,
        )
    }
}
