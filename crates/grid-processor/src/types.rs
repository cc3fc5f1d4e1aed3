//! Core types for neighborhood processing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProcessorError;

/// Interpolation and smoothing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterpMethod {
    /// Neighborhood minimum.
    Min,
    /// Neighborhood maximum.
    Max,
    /// Neighborhood median.
    Median,
    /// Unweighted mean.
    #[default]
    UwMean,
    /// Inverse-distance weighted mean.
    DwMean,
    /// Least-squares surface fit.
    LsFit,
    /// Fractional coverage of a threshold.
    Nbrhd,
    /// Bilinear interpolation.
    Bilin,
    /// Nearest grid point.
    Nearest,
    /// Neighborhood value closest to the observation.
    Best,
    UpperLeft,
    UpperRight,
    LowerRight,
    LowerLeft,
    /// Gaussian filter.
    Gaussian,
    /// Neighborhood maximum followed by a Gaussian filter.
    MaxGauss,
    /// Nearest value whose geography matches the observation.
    GeogMatch,
}

impl InterpMethod {
    /// Every method, in a stable order.
    pub const ALL: [InterpMethod; 17] = [
        Self::Min,
        Self::Max,
        Self::Median,
        Self::UwMean,
        Self::DwMean,
        Self::LsFit,
        Self::Nbrhd,
        Self::Bilin,
        Self::Nearest,
        Self::Best,
        Self::UpperLeft,
        Self::UpperRight,
        Self::LowerRight,
        Self::LowerLeft,
        Self::Gaussian,
        Self::MaxGauss,
        Self::GeogMatch,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Median => "MEDIAN",
            Self::UwMean => "UW_MEAN",
            Self::DwMean => "DW_MEAN",
            Self::LsFit => "LS_FIT",
            Self::Nbrhd => "NBRHD",
            Self::Bilin => "BILIN",
            Self::Nearest => "NEAREST",
            Self::Best => "BEST",
            Self::UpperLeft => "UPPER_LEFT",
            Self::UpperRight => "UPPER_RIGHT",
            Self::LowerRight => "LOWER_RIGHT",
            Self::LowerLeft => "LOWER_LEFT",
            Self::Gaussian => "GAUSSIAN",
            Self::MaxGauss => "MAXGAUSS",
            Self::GeogMatch => "GEOG_MATCH",
        }
    }
}

impl FromStr for InterpMethod {
    type Err = ProcessorError;

    /// Parse from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| ProcessorError::config(format!("unknown interpolation method '{}'", s)))
    }
}

impl TryFrom<String> for InterpMethod {
    type Error = ProcessorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InterpMethod> for String {
    fn from(method: InterpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
