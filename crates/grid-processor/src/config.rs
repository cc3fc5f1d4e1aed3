//! Configuration for the neighborhood engine.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vx_common::{SingleThresh, ThreshOp};

use crate::error::{ProcessorError, Result};
use crate::gaussian::GaussianInfo;
use crate::template::GridTemplateShape;
use crate::types::InterpMethod;

/// Engine defaults for smoothing, coverage and polygon parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smoothing method.
    pub interp_method: InterpMethod,

    /// Neighborhood width in grid cells.
    pub width: usize,

    /// Neighborhood shape.
    pub shape: GridTemplateShape,

    /// Treat the first and last columns as neighbors (global grids).
    pub wrap_lon: bool,

    /// Required fraction of valid cells in a neighborhood (0 to 1).
    pub vld_thresh: f64,

    /// Event threshold for fractional coverage.
    pub threshold: SingleThresh,

    /// Gaussian filter parameters.
    pub gaussian: GaussianInfo,

    /// Longitudes in polygon strings and files are positive west.
    pub west_longitude_positive: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interp_method: InterpMethod::UwMean,
            width: 3,
            shape: GridTemplateShape::Square,
            wrap_lon: false,
            vld_thresh: 1.0,
            threshold: SingleThresh::new(ThreshOp::Gt, 0.0),
            gaussian: GaussianInfo::default(),
            west_longitude_positive: false,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Parse `name` if it is set. A value that does not parse is an error
/// naming the variable.
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(val) => val.parse().map(Some).map_err(|e| {
            ProcessorError::config(format!("{}={:?} is invalid: {}", name, val, e))
        }),
        Err(_) => Ok(None),
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables leave the default in place; a set variable that
    /// does not parse is a [`ProcessorError::Config`].
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(method) = env_parse("VX_INTERP_METHOD")? {
            config.interp_method = method;
        }
        if let Some(width) = env_parse("VX_INTERP_WIDTH")? {
            config.width = width;
        }
        if let Some(shape) = env_parse("VX_INTERP_SHAPE")? {
            config.shape = shape;
        }
        if let Ok(val) = std::env::var("VX_WRAP_LON") {
            config.wrap_lon = env_flag(&val);
        }
        if let Some(t) = env_parse("VX_VLD_THRESH")? {
            config.vld_thresh = t;
        }
        if let Some(thresh) = env_parse("VX_THRESHOLD")? {
            config.threshold = thresh;
        }
        if let Some(r) = env_parse("VX_GAUSSIAN_RADIUS")? {
            config.gaussian.radius_km = r;
        }
        if let Some(dx) = env_parse("VX_GAUSSIAN_DX")? {
            config.gaussian.dx_km = dx;
        }
        if let Some(trunc) = env_parse("VX_GAUSSIAN_TRUNC")? {
            config.gaussian.trunc_factor = trunc;
        }
        if let Ok(val) = std::env::var("VX_WEST_LONGITUDE_POSITIVE") {
            config.west_longitude_positive = env_flag(&val);
        }

        Ok(config)
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.width == 0 {
            return Err("width must be > 0".to_string());
        }

        if self.shape == GridTemplateShape::Circle && self.width == 2 {
            return Err("circle templates do not support width 2".to_string());
        }

        if !(0.0..=1.0).contains(&self.vld_thresh) {
            return Err("vld_thresh must be between 0 and 1".to_string());
        }

        if self.gaussian.radius_km <= 0.0 || self.gaussian.dx_km <= 0.0 {
            return Err("gaussian radius and dx must be > 0".to_string());
        }

        if self.gaussian.trunc_factor <= 0.0 {
            return Err("gaussian trunc_factor must be > 0".to_string());
        }

        Ok(())
    }
}
