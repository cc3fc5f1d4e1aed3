//! Degree-based trigonometry and longitude helpers shared by the projections.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

pub(crate) const RAD_PER_DEG: f64 = std::f64::consts::PI / 180.0;
pub(crate) const DEG_PER_RAD: f64 = 180.0 / std::f64::consts::PI;

#[inline]
pub(crate) fn sind(a: f64) -> f64 {
    (a * RAD_PER_DEG).sin()
}

#[inline]
pub(crate) fn cosd(a: f64) -> f64 {
    (a * RAD_PER_DEG).cos()
}

#[inline]
pub(crate) fn tand(a: f64) -> f64 {
    (a * RAD_PER_DEG).tan()
}

#[inline]
pub(crate) fn atand(v: f64) -> f64 {
    v.atan() * DEG_PER_RAD
}

#[inline]
pub(crate) fn atan2d(y: f64, x: f64) -> f64 {
    y.atan2(x) * DEG_PER_RAD
}

/// Reduce a longitude into `[-180, 180)`.
#[inline]
pub fn rescale_lon(lon: f64) -> f64 {
    let mut l = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if l >= 180.0 {
        l -= 360.0;
    }
    l
}

/// Hemisphere of a polar or conic projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Parse the single-character `N`/`S` flag (case-insensitive).
    pub fn from_flag(flag: &str) -> Result<Self> {
        match flag {
            "N" | "n" => Ok(Self::North),
            "S" | "s" => Ok(Self::South),
            other => Err(GridError::BadHemisphere(other.to_string())),
        }
    }

    /// Hemisphere implied by the sign of a latitude.
    pub fn of_lat(lat: f64) -> Self {
        if lat < 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    /// +1 for north, -1 for south.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }

    pub fn flag(&self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}
