//! Fractional coverage fields.
//!
//! The coverage of a cell is the number of valid neighbors passing a
//! threshold divided by the number of valid neighbors. Both implementations
//! here slide a window up each column and only touch the cells that enter
//! or leave it, so the work per cell is proportional to the template width
//! rather than its area. Columns are independent and are processed in
//! parallel, each with its own window.

use rayon::prelude::*;
use tracing::debug;
use vx_common::{is_bad_data, DataPlane, SingleThresh, BAD_DATA};

use crate::error::{ProcessorError, Result};
use crate::smooth::check_vld_thresh;
use crate::template::{GridTemplate, GridTemplateShape};
use crate::types::InterpMethod;

/// Running tallies for one window.
#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    valid: usize,
    passed: usize,
}

impl Counts {
    fn fraction(&self, size: usize, vld_thresh: f64) -> f64 {
        if self.valid == 0 || (self.valid as f64 / size as f64) < vld_thresh {
            BAD_DATA
        } else {
            self.passed as f64 / self.valid as f64
        }
    }
}

/// Classify a cell: `None` if missing, otherwise whether it passes.
fn classify(v: f64, thresh: &SingleThresh) -> Option<bool> {
    if is_bad_data(v) {
        None
    } else {
        Some(thresh.check(v))
    }
}

fn check_width(width: usize) -> Result<()> {
    if width < 1 {
        return Err(ProcessorError::config(
            "fractional coverage width must be >= 1",
        ));
    }
    Ok(())
}

/// Assemble per-column results into a plane.
fn from_columns(dp: &DataPlane, columns: Vec<Vec<f64>>) -> DataPlane {
    let mut out = dp.clone();
    out.set_constant(BAD_DATA);
    for (x, column) in columns.into_iter().enumerate() {
        for (y, v) in column.into_iter().enumerate() {
            out.set(x, y, v);
        }
    }
    out
}

/// Fractional coverage using an arbitrary template shape.
pub fn fractional_coverage(
    dp: &DataPlane,
    width: usize,
    shape: GridTemplateShape,
    wrap_lon: bool,
    thresh: &SingleThresh,
    vld_thresh: f64,
) -> Result<DataPlane> {
    check_width(width)?;
    check_vld_thresh(vld_thresh)?;

    let gt = GridTemplate::new(shape, width, wrap_lon)?;
    debug!(
        thresh = %thresh,
        template = %gt,
        "Computing fractional coverage field using the {} threshold and the {}({}) {} interpolation method",
        thresh,
        InterpMethod::Nbrhd,
        gt.size(),
        gt.shape()
    );

    let (nx, ny) = dp.dims();
    if nx == 0 || ny == 0 {
        return Ok(dp.clone());
    }
    gt.check_wrap(nx)?;

    let columns = (0..nx)
        .into_par_iter()
        .map(|x| coverage_column(dp, &gt, x, thresh, vld_thresh))
        .collect::<Result<Vec<_>>>()?;

    Ok(from_columns(dp, columns))
}

fn coverage_column(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: usize,
    thresh: &SingleThresh,
    vld_thresh: f64,
) -> Result<Vec<f64>> {
    let ny = dp.ny();
    let size = gt.size();
    let mut column = Vec::with_capacity(ny);
    let mut counts = Counts::default();

    let tally = |counts: &mut Counts, cell: (usize, usize), add: bool| {
        if let Some(passed) = classify(dp.get(cell.0, cell.1), thresh) {
            if add {
                counts.valid += 1;
                counts.passed += passed as usize;
            } else {
                counts.valid -= 1;
                counts.passed -= passed as usize;
            }
        }
    };

    let mut window = gt.window(x as i64, 0, dp.nx(), ny);
    for cell in window.in_grid() {
        tally(&mut counts, cell, true);
    }
    column.push(counts.fraction(size, vld_thresh));

    for _ in 1..ny {
        for cell in window.bottom_edge() {
            tally(&mut counts, cell, false);
        }
        window.inc_base_y(1)?;
        for cell in window.top_edge() {
            tally(&mut counts, cell, true);
        }
        column.push(counts.fraction(size, vld_thresh));
    }

    Ok(column)
}

/// Fractional coverage over a `width` x `width` square, tracking the window
/// contents in a fixed ring buffer of `width * width` cells.
///
/// Produces the same field as [`fractional_coverage`] with a square shape.
pub fn fractional_coverage_square(
    dp: &DataPlane,
    width: usize,
    thresh: &SingleThresh,
    vld_thresh: f64,
) -> Result<DataPlane> {
    check_width(width)?;
    check_vld_thresh(vld_thresh)?;

    debug!(
        thresh = %thresh,
        width,
        "Computing fractional coverage field using the {} threshold and the {}({}) interpolation method",
        thresh,
        InterpMethod::Nbrhd,
        width * width
    );

    let (nx, ny) = dp.dims();
    if nx == 0 || ny == 0 {
        return Ok(dp.clone());
    }

    let columns: Vec<Vec<f64>> = (0..nx)
        .into_par_iter()
        .map(|x| square_column(dp, width, x, thresh, vld_thresh))
        .collect();

    Ok(from_columns(dp, columns))
}

fn square_column(
    dp: &DataPlane,
    width: usize,
    x: usize,
    thresh: &SingleThresh,
    vld_thresh: f64,
) -> Vec<f64> {
    let w = width as i64;
    let size = width * width;
    // lower-left offset matching the template convention for even widths
    let lower = if w % 2 == 1 { (w - 1) / 2 } else { w / 2 - 1 };
    let x_ll = x as i64 - lower;

    let sample = |xx: i64, yy: i64| -> Option<bool> {
        dp.try_get(xx, yy).and_then(|v| classify(v, thresh))
    };

    // box[j * width + i] holds column x_ll + i of one window row
    let mut ring: Box<[Option<bool>]> = vec![None; size].into_boxed_slice();
    let mut counts = Counts::default();
    let mut column = Vec::with_capacity(dp.ny());

    for y in 0..dp.ny() as i64 {
        let y_ll = y - lower;

        if y == 0 {
            for j in 0..width {
                for i in 0..width {
                    let k = sample(x_ll + i as i64, y_ll + j as i64);
                    ring[j * width + i] = k;
                    if let Some(passed) = k {
                        counts.valid += 1;
                        counts.passed += passed as usize;
                    }
                }
            }
        } else {
            // the oldest row sits in slot (y - 1) % width
            let j = ((y - 1) % w) as usize;
            let y_ur = y_ll + w - 1;
            for i in 0..width {
                let n = j * width + i;
                if let Some(passed) = ring[n] {
                    counts.valid -= 1;
                    counts.passed -= passed as usize;
                }
                let k = sample(x_ll + i as i64, y_ur);
                ring[n] = k;
                if let Some(passed) = k {
                    counts.valid += 1;
                    counts.passed += passed as usize;
                }
            }
        }

        column.push(counts.fraction(size, vld_thresh));
    }

    column
}
