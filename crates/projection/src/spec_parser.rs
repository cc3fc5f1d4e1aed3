//! Parser for whitespace-separated grid specification strings.
//!
//! ```text
//! lambert   Nx Ny lat_ll lon_ll lon_orient D_km R_km phi_1 [phi_2] H
//! stereo    Nx Ny lat_ll lon_ll lon_orient D_km R_km lat_scale H
//! latlon    Nx Ny lat_ll lon_ll delta_lat delta_lon
//! mercator  Nx Ny lat_ll lon_ll lat_ur lon_ur
//! rotlatlon Nx Ny lat_ll lon_ll delta_lat delta_lon true_lat_sp true_lon_sp aux_rot
//! gaussian  lon_zero Nx Ny
//! ```
//!
//! Conic and polar grids are pinned at their lower-left point. For
//! `rotlatlon` the lower-left corner and increments are in rotated
//! coordinates. With `west_longitude_positive` set, longitudes measured in
//! the true frame are read as degrees west.

use crate::angles::{rescale_lon, Hemisphere};
use crate::error::{GridError, Result};
use crate::gaussian::GaussianData;
use crate::grid::GridDefinition;
use crate::lambert::LambertData;
use crate::latlon::LatLonData;
use crate::mercator::MercatorData;
use crate::polar::StereographicData;
use crate::rotated::RotatedLatLonData;

/// Token cursor over a specification string.
struct Tokens<'a> {
    spec: &'a str,
    tokens: Vec<&'a str>,
    pos: usize,
    west_positive: bool,
}

impl<'a> Tokens<'a> {
    fn next_str(&mut self) -> Result<&'a str> {
        let tok = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| GridError::invalid_spec(format!("'{}': too few tokens", self.spec)))?;
        self.pos += 1;
        Ok(tok)
    }

    fn number(&mut self) -> Result<f64> {
        let tok = self.next_str()?;
        tok.parse::<f64>().map_err(|_| {
            GridError::invalid_spec(format!("'{}': '{}' is not a number", self.spec, tok))
        })
    }

    /// A longitude in the true frame, converted to degrees east.
    fn longitude(&mut self) -> Result<f64> {
        let lon = self.number()?;
        Ok(rescale_lon(if self.west_positive { -lon } else { lon }))
    }

    fn dimension_pair(&mut self) -> Result<(usize, usize)> {
        let nx = self.count()?;
        let ny = self.count()?;
        if nx <= 0 || ny <= 0 {
            return Err(GridError::InvalidDimensions { nx, ny });
        }
        Ok((nx as usize, ny as usize))
    }

    fn count(&mut self) -> Result<i64> {
        let tok = self.next_str()?;
        tok.parse::<i64>().map_err(|_| {
            GridError::invalid_spec(format!("'{}': '{}' is not an integer", self.spec, tok))
        })
    }

    fn hemisphere(&mut self) -> Result<Hemisphere> {
        Hemisphere::from_flag(self.next_str()?)
    }
}

fn expect_tokens(spec: &str, kind: &str, found: usize, allowed: &[usize]) -> Result<()> {
    if allowed.contains(&found) {
        return Ok(());
    }
    let wanted = allowed
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(GridError::invalid_spec(format!(
        "'{}': {} grids need {} tokens, found {}",
        spec, kind, wanted, found
    )))
}

/// Parse a specification string into a grid definition.
///
/// The projection keyword is case-insensitive. The definition is named
/// after the normalised specification string.
pub fn parse_grid_spec(spec: &str, west_longitude_positive: bool) -> Result<GridDefinition> {
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    let Some(kind) = tokens.first().map(|t| t.to_ascii_lowercase()) else {
        return Err(GridError::invalid_spec("empty grid specification"));
    };
    let name = tokens.join(" ");
    let count = tokens.len();

    let mut t = Tokens {
        spec,
        tokens,
        pos: 1,
        west_positive: west_longitude_positive,
    };

    let def = match kind.as_str() {
        "lambert" | "lambert_conformal" | "lcc" => {
            expect_tokens(spec, "lambert", count, &[10, 11])?;
            let (nx, ny) = t.dimension_pair()?;
            let lat_ll = t.number()?;
            let lon_ll = t.longitude()?;
            let lon_orient = t.longitude()?;
            let d_km = t.number()?;
            let r_km = t.number()?;
            let scale_lat_1 = t.number()?;
            let scale_lat_2 = if count == 11 { t.number()? } else { scale_lat_1 };
            let hemisphere = t.hemisphere()?;
            GridDefinition::Lambert(LambertData {
                name,
                hemisphere,
                scale_lat_1,
                scale_lat_2,
                lat_pin: lat_ll,
                lon_pin: lon_ll,
                x_pin: 0.0,
                y_pin: 0.0,
                lon_orient,
                d_km,
                r_km,
                nx,
                ny,
            })
        }
        "stereo" | "stereographic" => {
            expect_tokens(spec, "stereo", count, &[10])?;
            let (nx, ny) = t.dimension_pair()?;
            let lat_ll = t.number()?;
            let lon_ll = t.longitude()?;
            let lon_orient = t.longitude()?;
            let d_km = t.number()?;
            let r_km = t.number()?;
            let scale_lat = t.number()?;
            let hemisphere = t.hemisphere()?;
            GridDefinition::Stereographic(StereographicData {
                name,
                hemisphere,
                scale_lat,
                lat_pin: lat_ll,
                lon_pin: lon_ll,
                x_pin: 0.0,
                y_pin: 0.0,
                lon_orient,
                d_km,
                r_km,
                nx,
                ny,
            })
        }
        "latlon" => {
            expect_tokens(spec, "latlon", count, &[7])?;
            let (nx, ny) = t.dimension_pair()?;
            GridDefinition::LatLon(LatLonData {
                name,
                lat_ll: t.number()?,
                lon_ll: t.longitude()?,
                delta_lat: t.number()?,
                delta_lon: t.number()?,
                nx,
                ny,
            })
        }
        "mercator" => {
            expect_tokens(spec, "mercator", count, &[7])?;
            let (nx, ny) = t.dimension_pair()?;
            GridDefinition::Mercator(MercatorData {
                name,
                lat_ll: t.number()?,
                lon_ll: t.longitude()?,
                lat_ur: t.number()?,
                lon_ur: t.longitude()?,
                nx,
                ny,
            })
        }
        "rotlatlon" => {
            expect_tokens(spec, "rotlatlon", count, &[10])?;
            let (nx, ny) = t.dimension_pair()?;
            GridDefinition::RotatedLatLon(RotatedLatLonData {
                name,
                rot_lat_ll: t.number()?,
                rot_lon_ll: t.number()?,
                delta_rot_lat: t.number()?,
                delta_rot_lon: t.number()?,
                nx,
                ny,
                true_lat_south_pole: t.number()?,
                true_lon_south_pole: t.longitude()?,
                aux_rotation: t.number()?,
            })
        }
        "gaussian" => {
            expect_tokens(spec, "gaussian", count, &[4])?;
            let lon_zero = t.longitude()?;
            let (nx, ny) = t.dimension_pair()?;
            GridDefinition::Gaussian(GaussianData {
                name,
                lon_zero,
                nx,
                ny,
            })
        }
        _ => return Err(GridError::UnknownProjection(kind)),
    };

    tracing::debug!(kind = %def.kind(), grid = %def.name(), "parsed grid specification");
    Ok(def)
}
