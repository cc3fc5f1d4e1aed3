//! Configured front end for the neighborhood operations.

use tracing::info;
use vx_common::{DataPlane, SingleThresh};

use crate::config::EngineConfig;
use crate::coverage::{fractional_coverage, fractional_coverage_square};
use crate::error::{ProcessorError, Result};
use crate::smooth::{smooth_field, SmoothParams};
use crate::template::{GridTemplate, GridTemplateShape};

/// Smoothing and fractional coverage driven by one validated
/// [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct NeighborhoodEngine {
    config: EngineConfig,
}

impl NeighborhoodEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(ProcessorError::Config)?;
        info!(
            method = %config.interp_method,
            width = config.width,
            shape = %config.shape,
            vld_thresh = config.vld_thresh,
            "Neighborhood engine configured"
        );
        Ok(Self { config })
    }

    /// Engine configured from `VX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Template described by the configured shape and width.
    pub fn template(&self) -> Result<GridTemplate> {
        GridTemplate::new(self.config.shape, self.config.width, self.config.wrap_lon)
    }

    pub fn smooth_params(&self) -> SmoothParams {
        SmoothParams {
            method: self.config.interp_method,
            width: self.config.width,
            shape: self.config.shape,
            wrap_lon: self.config.wrap_lon,
            vld_thresh: self.config.vld_thresh,
            gaussian: self.config.gaussian,
        }
    }

    /// Smooth `dp` with the configured method.
    pub fn smooth(&self, dp: &DataPlane) -> Result<DataPlane> {
        smooth_field(dp, &self.smooth_params())
    }

    /// Fractional coverage of the configured threshold.
    pub fn coverage(&self, dp: &DataPlane) -> Result<DataPlane> {
        self.coverage_with(dp, &self.config.threshold)
    }

    /// Fractional coverage of `thresh`, using the ring-buffer square
    /// implementation when the template is a square that does not wrap.
    pub fn coverage_with(&self, dp: &DataPlane, thresh: &SingleThresh) -> Result<DataPlane> {
        let c = &self.config;
        if c.shape == GridTemplateShape::Square && !c.wrap_lon {
            fractional_coverage_square(dp, c.width, thresh, c.vld_thresh)
        } else {
            fractional_coverage(dp, c.width, c.shape, c.wrap_lon, thresh, c.vld_thresh)
        }
    }
}
