//! Grid projections for gridded verification.
//!
//! A [`Grid`] is one of a closed set of projections (Lambert conformal,
//! polar stereographic, Mercator, lat/lon, rotated lat/lon, Gaussian and
//! semi-lat/lon), each implementing [`GridProjection`]. Grids come from the
//! built-in [`catalog`] of named NCEP/DTC grids or from a specification
//! string (see [`spec_parser`]).
//!
//! All longitudes are degrees east, reduced to [-180, 180).

pub mod angles;
pub mod catalog;
pub mod error;
pub mod gaussian;
pub mod grid;
pub mod lambert;
pub mod latlon;
pub mod mercator;
pub mod polar;
pub mod rotated;
pub mod semilatlon;
pub mod spec_parser;

pub use angles::{rescale_lon, Hemisphere};
pub use catalog::{find_definition, find_grid_by_name, NCEP_EARTH_RADIUS_KM};
pub use error::{GridError, Result};
pub use gaussian::{GaussianData, GaussianGrid};
pub use grid::{Grid, GridDefinition, GridProjection, ProjectionKind};
pub use lambert::{LambertData, LambertGrid};
pub use latlon::{LatLonData, LatLonGrid};
pub use mercator::{MercatorData, MercatorGrid};
pub use polar::{StereographicData, StereographicGrid};
pub use rotated::{RotatedLatLonData, RotatedLatLonGrid};
pub use semilatlon::{SemiLatLonData, SemiLatLonGrid};
pub use spec_parser::parse_grid_spec;
