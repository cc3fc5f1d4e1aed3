//! Neighborhood smoothing of a whole field.

use rayon::prelude::*;
use tracing::debug;
use vx_common::{DataPlane, MaskPlane};

use crate::error::{ProcessorError, Result};
use crate::gaussian::{apply_gaussian, GaussianInfo};
use crate::interp::{interp_max, interp_median, interp_min, interp_uw_mean};
use crate::template::{GridTemplate, GridTemplateShape};
use crate::types::InterpMethod;

/// Parameters shared by [`smooth_field`] calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    pub method: InterpMethod,
    pub width: usize,
    pub shape: GridTemplateShape,
    /// Treat the first and last columns as neighbors.
    pub wrap_lon: bool,
    /// Required fraction of valid cells in a neighborhood.
    pub vld_thresh: f64,
    pub gaussian: GaussianInfo,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            method: InterpMethod::UwMean,
            width: 3,
            shape: GridTemplateShape::Square,
            wrap_lon: false,
            vld_thresh: 1.0,
            gaussian: GaussianInfo::default(),
        }
    }
}

pub(crate) fn check_vld_thresh(t: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&t) {
        return Err(ProcessorError::config(format!(
            "valid data threshold {} must be between 0 and 1",
            t
        )));
    }
    Ok(())
}

/// Replace every cell with a statistic of its neighborhood.
///
/// Supported methods are `MIN`, `MAX`, `MEDIAN`, `UW_MEAN`, `NEAREST`,
/// `GAUSSIAN` and `MAXGAUSS`. `NEAREST` and any width of 1 return the
/// input unchanged, except for the Gaussian methods, whose filter does not
/// depend on the template width.
pub fn smooth_field(dp: &DataPlane, params: &SmoothParams) -> Result<DataPlane> {
    if params.width == 0 {
        return Err(ProcessorError::config("smoothing width must be >= 1"));
    }
    check_vld_thresh(params.vld_thresh)?;

    let method = params.method;
    match method {
        InterpMethod::Min
        | InterpMethod::Max
        | InterpMethod::Median
        | InterpMethod::UwMean
        | InterpMethod::Nearest => {
            if method == InterpMethod::Nearest || params.width == 1 {
                return Ok(dp.clone());
            }
            neighborhood_pass(dp, method, params)
        }
        InterpMethod::Gaussian => {
            debug!(method = %method, "Smoothing field using the {} method", method);
            apply_gaussian(dp, &params.gaussian, params.wrap_lon, params.vld_thresh)
        }
        InterpMethod::MaxGauss => {
            let max_field = if params.width == 1 {
                dp.clone()
            } else {
                neighborhood_pass(dp, InterpMethod::Max, params)?
            };
            debug!(method = %method, "Smoothing field using the {} method", method);
            apply_gaussian(&max_field, &params.gaussian, params.wrap_lon, params.vld_thresh)
        }
        other => Err(ProcessorError::unsupported_method(other)),
    }
}

/// Per-cell neighborhood statistic with the `interp_*` signature.
type CellStat = fn(&DataPlane, &GridTemplate, i64, i64, f64, Option<&MaskPlane>) -> f64;

fn neighborhood_pass(
    dp: &DataPlane,
    method: InterpMethod,
    params: &SmoothParams,
) -> Result<DataPlane> {
    let gt = GridTemplate::new(params.shape, params.width, params.wrap_lon)?;
    let stat: CellStat = match method {
        InterpMethod::Min => interp_min,
        InterpMethod::Max => interp_max,
        InterpMethod::Median => interp_median,
        InterpMethod::UwMean => interp_uw_mean,
        other => return Err(ProcessorError::unsupported_method(other)),
    };

    debug!(
        method = %method,
        template = %gt,
        nx = dp.nx(),
        ny = dp.ny(),
        "Smoothing field using the {}({}) {} interpolation method",
        method,
        gt.size(),
        gt.shape()
    );

    let mut out = dp.clone();
    if dp.is_empty() {
        return Ok(out);
    }
    gt.check_wrap(dp.nx())?;

    let t = params.vld_thresh;
    out.data_mut()
        .par_chunks_mut(dp.nx())
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = stat(dp, &gt, x as i64, y as i64, t, None);
            }
        });

    Ok(out)
}
