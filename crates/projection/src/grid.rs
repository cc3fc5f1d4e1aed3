//! The grid abstraction: a capability trait plus a closed sum type over the
//! supported projections.

use std::fmt;

use serde::{Deserialize, Serialize};
use vx_common::{is_bad_data, BoundingBox};

use crate::angles::rescale_lon;
use crate::catalog::find_grid_by_name;
use crate::error::{GridError, Result};
use crate::gaussian::{GaussianData, GaussianGrid};
use crate::lambert::{LambertData, LambertGrid};
use crate::latlon::{LatLonData, LatLonGrid};
use crate::mercator::{MercatorData, MercatorGrid};
use crate::polar::{StereographicData, StereographicGrid};
use crate::rotated::{RotatedLatLonData, RotatedLatLonGrid};
use crate::semilatlon::{SemiLatLonData, SemiLatLonGrid};
use crate::spec_parser::parse_grid_spec;

/// Number of samples per edge when estimating the geographic bounds.
const EDGE_SAMPLES: usize = 50;

/// Parameters closer than this are considered equal when comparing grids.
const PARAM_TOL: f64 = 1.0e-5;

/// Coordinate transforms shared by every grid projection.
///
/// Grid coordinates are in grid units with `(0, 0)` at the lower-left
/// point; latitudes and longitudes are degrees, longitudes east-positive.
pub trait GridProjection {
    fn name(&self) -> &str;

    fn nx(&self) -> usize;

    fn ny(&self) -> usize;

    /// Convert grid coordinates to `(lat, lon)`.
    fn xy_to_latlon(&self, x: f64, y: f64) -> (f64, f64);

    /// Convert `(lat, lon)` to fractional grid coordinates.
    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Angle (degrees) that rotates grid-relative vectors to earth-relative.
    fn rot_grid_to_earth(&self, x: f64, y: f64) -> f64;

    /// Whether the grid wraps all the way around in longitude.
    fn is_global(&self) -> bool {
        false
    }

    /// Multi-line description of every parameter.
    fn dump(&self) -> String;

    /// One-line description.
    fn summary(&self) -> String;

    /// Geographic bounds, estimated by sampling along the grid edges.
    ///
    /// `min_x`/`max_x` hold longitudes and `min_y`/`max_y` latitudes.
    fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        let x_max = self.nx().saturating_sub(1) as f64;
        let y_max = self.ny().saturating_sub(1) as f64;

        for t in 0..=EDGE_SAMPLES {
            let frac = t as f64 / EDGE_SAMPLES as f64;
            let edges = [
                (frac * x_max, 0.0),
                (frac * x_max, y_max),
                (0.0, frac * y_max),
                (x_max, frac * y_max),
            ];
            for (x, y) in edges {
                let (lat, lon) = self.xy_to_latlon(x, y);
                if !is_bad_data(lat) && !is_bad_data(lon) {
                    bbox.extend(lon, lat);
                }
            }
        }
        bbox
    }
}

/// Projection kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    Lambert,
    Stereographic,
    Mercator,
    LatLon,
    RotatedLatLon,
    Gaussian,
    SemiLatLon,
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lambert => "Lambert Conformal",
            Self::Stereographic => "Polar Stereographic",
            Self::Mercator => "Mercator",
            Self::LatLon => "LatLon",
            Self::RotatedLatLon => "Rotated LatLon",
            Self::Gaussian => "Gaussian",
            Self::SemiLatLon => "SemiLatLon",
        };
        f.write_str(s)
    }
}

/// Serializable grid parameters, tagged by projection kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridDefinition {
    Lambert(LambertData),
    Stereographic(StereographicData),
    Mercator(MercatorData),
    LatLon(LatLonData),
    RotatedLatLon(RotatedLatLonData),
    Gaussian(GaussianData),
    SemiLatLon(SemiLatLonData),
}

impl GridDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Lambert(d) => &d.name,
            Self::Stereographic(d) => &d.name,
            Self::Mercator(d) => &d.name,
            Self::LatLon(d) => &d.name,
            Self::RotatedLatLon(d) => &d.name,
            Self::Gaussian(d) => &d.name,
            Self::SemiLatLon(d) => &d.name,
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Lambert(_) => ProjectionKind::Lambert,
            Self::Stereographic(_) => ProjectionKind::Stereographic,
            Self::Mercator(_) => ProjectionKind::Mercator,
            Self::LatLon(_) => ProjectionKind::LatLon,
            Self::RotatedLatLon(_) => ProjectionKind::RotatedLatLon,
            Self::Gaussian(_) => ProjectionKind::Gaussian,
            Self::SemiLatLon(_) => ProjectionKind::SemiLatLon,
        }
    }
}

/// A grid of any supported projection.
#[derive(Debug, Clone)]
pub enum Grid {
    Lambert(LambertGrid),
    Stereographic(StereographicGrid),
    Mercator(MercatorGrid),
    LatLon(LatLonGrid),
    RotatedLatLon(RotatedLatLonGrid),
    Gaussian(GaussianGrid),
    SemiLatLon(SemiLatLonGrid),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Grid::Lambert($g) => $body,
            Grid::Stereographic($g) => $body,
            Grid::Mercator($g) => $body,
            Grid::LatLon($g) => $body,
            Grid::RotatedLatLon($g) => $body,
            Grid::Gaussian($g) => $body,
            Grid::SemiLatLon($g) => $body,
        }
    };
}

impl Grid {
    /// Build a grid from its definition.
    pub fn new(def: GridDefinition) -> Result<Self> {
        tracing::debug!(grid = %def.name(), kind = %def.kind(), "building grid");
        let grid = match def {
            GridDefinition::Lambert(d) => Self::Lambert(LambertGrid::new(d)?),
            GridDefinition::Stereographic(d) => Self::Stereographic(StereographicGrid::new(d)?),
            GridDefinition::Mercator(d) => Self::Mercator(MercatorGrid::new(d)?),
            GridDefinition::LatLon(d) => Self::LatLon(LatLonGrid::new(d)?),
            GridDefinition::RotatedLatLon(d) => Self::RotatedLatLon(RotatedLatLonGrid::new(d)?),
            GridDefinition::Gaussian(d) => Self::Gaussian(GaussianGrid::new(d)?),
            GridDefinition::SemiLatLon(d) => Self::SemiLatLon(SemiLatLonGrid::new(d)?),
        };
        Ok(grid)
    }

    /// Look up a named grid in the built-in catalog.
    pub fn from_name(name: &str) -> Result<Self> {
        find_grid_by_name(name).ok_or_else(|| GridError::GridNotFound(name.to_string()))
    }

    /// Parse a grid specification string such as
    /// `latlon 5 5 0 0 1 1`.
    pub fn from_spec(spec: &str, west_longitude_positive: bool) -> Result<Self> {
        Self::new(parse_grid_spec(spec, west_longitude_positive)?)
    }

    /// Resolve a catalog name, falling back to a specification string.
    pub fn parse(name_or_spec: &str) -> Result<Self> {
        let trimmed = name_or_spec.trim();
        match find_grid_by_name(trimmed) {
            Some(grid) => Ok(grid),
            None => Self::from_spec(trimmed, false),
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Lambert(_) => ProjectionKind::Lambert,
            Self::Stereographic(_) => ProjectionKind::Stereographic,
            Self::Mercator(_) => ProjectionKind::Mercator,
            Self::LatLon(_) => ProjectionKind::LatLon,
            Self::RotatedLatLon(_) => ProjectionKind::RotatedLatLon,
            Self::Gaussian(_) => ProjectionKind::Gaussian,
            Self::SemiLatLon(_) => ProjectionKind::SemiLatLon,
        }
    }

    /// The parameters this grid was built from.
    pub fn definition(&self) -> GridDefinition {
        match self {
            Self::Lambert(g) => GridDefinition::Lambert(g.data().clone()),
            Self::Stereographic(g) => GridDefinition::Stereographic(g.data().clone()),
            Self::Mercator(g) => GridDefinition::Mercator(g.data().clone()),
            Self::LatLon(g) => GridDefinition::LatLon(g.data().clone()),
            Self::RotatedLatLon(g) => GridDefinition::RotatedLatLon(g.data().clone()),
            Self::Gaussian(g) => GridDefinition::Gaussian(g.data().clone()),
            Self::SemiLatLon(g) => GridDefinition::SemiLatLon(g.data().clone()),
        }
    }

    /// Total number of grid points.
    pub fn nxy(&self) -> usize {
        self.nx() * self.ny()
    }
}

impl GridProjection for Grid {
    fn name(&self) -> &str {
        dispatch!(self, g => g.name())
    }

    fn nx(&self) -> usize {
        dispatch!(self, g => g.nx())
    }

    fn ny(&self) -> usize {
        dispatch!(self, g => g.ny())
    }

    fn xy_to_latlon(&self, x: f64, y: f64) -> (f64, f64) {
        dispatch!(self, g => g.xy_to_latlon(x, y))
    }

    fn latlon_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        dispatch!(self, g => g.latlon_to_xy(lat, lon))
    }

    fn rot_grid_to_earth(&self, x: f64, y: f64) -> f64 {
        dispatch!(self, g => g.rot_grid_to_earth(x, y))
    }

    fn is_global(&self) -> bool {
        dispatch!(self, g => g.is_global())
    }

    fn dump(&self) -> String {
        dispatch!(self, g => g.dump())
    }

    fn summary(&self) -> String {
        dispatch!(self, g => g.summary())
    }

    fn bounding_box(&self) -> BoundingBox {
        dispatch!(self, g => g.bounding_box())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// A numeric parameter: plain values compare directly, longitudes modulo 360.
enum Param {
    Value(f64),
    Lon(f64),
}

fn params(def: &GridDefinition) -> Vec<Param> {
    use Param::{Lon, Value};
    match def {
        GridDefinition::Lambert(d) => vec![
            Value(d.hemisphere.sign()),
            Value(d.scale_lat_1),
            Value(d.scale_lat_2),
            Value(d.lat_pin),
            Lon(d.lon_pin),
            Value(d.x_pin),
            Value(d.y_pin),
            Lon(d.lon_orient),
            Value(d.d_km),
            Value(d.r_km),
        ],
        GridDefinition::Stereographic(d) => vec![
            Value(d.hemisphere.sign()),
            Value(d.scale_lat),
            Value(d.lat_pin),
            Lon(d.lon_pin),
            Value(d.x_pin),
            Value(d.y_pin),
            Lon(d.lon_orient),
            Value(d.d_km),
            Value(d.r_km),
        ],
        GridDefinition::Mercator(d) => vec![
            Value(d.lat_ll),
            Lon(d.lon_ll),
            Value(d.lat_ur),
            Lon(d.lon_ur),
        ],
        GridDefinition::LatLon(d) => vec![
            Value(d.lat_ll),
            Lon(d.lon_ll),
            Value(d.delta_lat),
            Value(d.delta_lon),
        ],
        GridDefinition::RotatedLatLon(d) => vec![
            Value(d.rot_lat_ll),
            Lon(d.rot_lon_ll),
            Value(d.delta_rot_lat),
            Value(d.delta_rot_lon),
            Value(d.true_lat_south_pole),
            Lon(d.true_lon_south_pole),
            Value(d.aux_rotation),
        ],
        GridDefinition::Gaussian(d) => vec![Lon(d.lon_zero)],
        GridDefinition::SemiLatLon(d) => d
            .lats
            .iter()
            .map(|v| Value(*v))
            .chain(d.lons.iter().map(|v| Lon(*v)))
            .chain(d.levels.iter().map(|v| Value(*v)))
            .chain(d.times.iter().map(|v| Value(*v as f64)))
            .collect(),
    }
}

/// Grids are equal when they share a projection, dimensions and parameters
/// (within a small tolerance). Names are ignored.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        if self.kind() != other.kind() || self.nx() != other.nx() || self.ny() != other.ny() {
            return false;
        }

        let a = params(&self.definition());
        let b = params(&other.definition());
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|pair| match pair {
                (Param::Value(p), Param::Value(q)) => (p - q).abs() < PARAM_TOL,
                (Param::Lon(p), Param::Lon(q)) => rescale_lon(p - q).abs() < PARAM_TOL,
                _ => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latlon(name: &str, lon_ll: f64) -> Grid {
        Grid::new(GridDefinition::LatLon(LatLonData {
            name: name.to_string(),
            lat_ll: 0.0,
            lon_ll,
            delta_lat: 1.0,
            delta_lon: 1.0,
            nx: 5,
            ny: 5,
        }))
        .unwrap()
    }

    #[test]
    fn test_delegation() {
        let grid = latlon("five", 0.0);
        assert_eq!(grid.kind(), ProjectionKind::LatLon);
        assert_eq!(grid.name(), "five");
        assert_eq!((grid.nx(), grid.ny(), grid.nxy()), (5, 5, 25));
        assert_eq!(grid.latlon_to_xy(2.0, 2.0), (2.0, 2.0));
        assert_eq!(grid.rot_grid_to_earth(2.0, 2.0), 0.0);
        assert!(grid.dump().contains("Lat/Lon"));
        assert_eq!(grid.to_string(), grid.summary());
    }

    #[test]
    fn test_equality_ignores_name_and_wraps_longitude() {
        assert_eq!(latlon("a", -10.0), latlon("b", 350.0));
        assert_ne!(latlon("a", 0.0), latlon("a", 0.5));
    }

    #[test]
    fn test_bounding_box_samples_edges() {
        let bbox = latlon("box", 10.0).bounding_box();
        assert!((bbox.min_x - 10.0).abs() < 1e-9);
        assert!((bbox.max_x - 14.0).abs() < 1e-9);
        assert!((bbox.min_y - 0.0).abs() < 1e-9);
        assert!((bbox.max_y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_definition_serde_tag() {
        let def = latlon("tagged", 0.0).definition();
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("\"type\":\"lat_lon\""), "{}", json);
        let back: GridDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let err = Grid::from_name("G999").unwrap_err();
        assert!(matches!(err, GridError::GridNotFound(_)));
    }
}
