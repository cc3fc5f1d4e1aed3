//! Per-cell neighborhood statistics and point interpolation.
//!
//! Every neighborhood helper walks the in-grid cells of a [`GridTemplate`]
//! centered at `(x, y)`, skipping missing values and, when a mask is given,
//! cells where the mask is off. The result is [`BAD_DATA`] when no valid
//! value was found or when the number of valid values divided by the
//! unclipped template size is below the valid-fraction threshold `t`.

use vx_common::{is_bad_data, is_eq, DataPlane, MaskPlane, SingleThresh, BAD_DATA};

use crate::error::{ProcessorError, Result};
use crate::template::{GridTemplate, GridTemplateShape};
use crate::types::InterpMethod;

/// Exponent of the inverse-distance weights used by `DW_MEAN`.
pub const DW_MEAN_POW: i32 = 2;

fn enough_valid(n_valid: usize, size: usize, t: f64) -> bool {
    size > 0 && n_valid > 0 && (n_valid as f64 / size as f64) >= t
}

fn masked_out(mask: Option<&MaskPlane>, x: usize, y: usize) -> bool {
    mask.map_or(false, |m| !m.get(x, y))
}

/// Valid values of the neighborhood centered at `(x, y)`.
fn valid_values<'a>(
    dp: &'a DataPlane,
    gt: &'a GridTemplate,
    x: i64,
    y: i64,
    mask: Option<&'a MaskPlane>,
) -> impl Iterator<Item = ((usize, usize), f64)> + 'a {
    gt.window(x, y, dp.nx(), dp.ny())
        .in_grid()
        .filter(move |&(cx, cy)| !masked_out(mask, cx, cy))
        .map(move |(cx, cy)| ((cx, cy), dp.get(cx, cy)))
        .filter(|&(_, v)| !is_bad_data(v))
}

/// Base cell for a point: nearest cell for odd widths, lower-left cell for
/// even widths.
pub fn center_cell(obs_x: f64, obs_y: f64, width: usize) -> (i64, i64) {
    if width % 2 == 0 {
        (obs_x.floor() as i64, obs_y.floor() as i64)
    } else {
        (obs_x.round() as i64, obs_y.round() as i64)
    }
}

pub fn interp_min(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut n = 0;
    let mut min_v = f64::INFINITY;
    for (_, v) in valid_values(dp, gt, x, y, mask) {
        min_v = min_v.min(v);
        n += 1;
    }
    if enough_valid(n, gt.size(), t) {
        min_v
    } else {
        BAD_DATA
    }
}

pub fn interp_max(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut n = 0;
    let mut max_v = f64::NEG_INFINITY;
    for (_, v) in valid_values(dp, gt, x, y, mask) {
        max_v = max_v.max(v);
        n += 1;
    }
    if enough_valid(n, gt.size(), t) {
        max_v
    } else {
        BAD_DATA
    }
}

/// Median of the valid neighborhood values, interpolating between the two
/// middle values for an even count.
pub fn interp_median(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut values: Vec<f64> = valid_values(dp, gt, x, y, mask).map(|(_, v)| v).collect();
    if !enough_valid(values.len(), gt.size(), t) {
        return BAD_DATA;
    }
    values.sort_by(f64::total_cmp);
    percentile(&values, 0.5)
}

/// Linear-interpolated percentile of sorted values, `p` in `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => BAD_DATA,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

pub fn interp_uw_mean(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut n = 0;
    let mut sum = 0.0;
    for (_, v) in valid_values(dp, gt, x, y, mask) {
        sum += v;
        n += 1;
    }
    if enough_valid(n, gt.size(), t) {
        sum / n as f64
    } else {
        BAD_DATA
    }
}

/// Inverse-distance weighted mean at a point, weights `dist^-pow`.
///
/// A valid cell within 0.001 grid units of the point is returned as is.
pub fn interp_dw_mean(
    dp: &DataPlane,
    gt: &GridTemplate,
    obs_x: f64,
    obs_y: f64,
    pow: i32,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let (x, y) = center_cell(obs_x, obs_y, gt.width());

    let mut n = 0;
    let mut weight_sum = 0.0;
    let mut numerator = 0.0;
    for ((cx, cy), v) in valid_values(dp, gt, x, y, mask) {
        let dist = ((obs_x - cx as f64).powi(2) + (obs_y - cy as f64).powi(2)).sqrt();
        if dist <= 0.001 {
            return v;
        }
        let weight = dist.powi(-pow);
        weight_sum += weight;
        numerator += weight * v;
        n += 1;
    }

    if enough_valid(n, gt.size(), t) {
        numerator / weight_sum
    } else {
        BAD_DATA
    }
}

/// Fraction of the valid neighborhood values that pass `thresh`.
pub fn interp_nbrhd(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    t: f64,
    thresh: &SingleThresh,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut n = 0;
    let mut n_thr = 0;
    for (_, v) in valid_values(dp, gt, x, y, mask) {
        n += 1;
        if thresh.check(v) {
            n_thr += 1;
        }
    }
    if enough_valid(n, gt.size(), t) {
        n_thr as f64 / n as f64
    } else {
        BAD_DATA
    }
}

/// Valid neighborhood value closest to `obs_v`.
pub fn interp_best(
    dp: &DataPlane,
    gt: &GridTemplate,
    x: i64,
    y: i64,
    obs_v: f64,
    t: f64,
    mask: Option<&MaskPlane>,
) -> f64 {
    let mut n = 0;
    let mut best: Option<(f64, f64)> = None;
    for (_, v) in valid_values(dp, gt, x, y, mask) {
        let d = (v - obs_v).abs();
        if best.map_or(true, |(min_d, _)| d < min_d) {
            best = Some((d, v));
        }
        n += 1;
    }
    match best {
        Some((_, v)) if enough_valid(n, gt.size(), t) => v,
        _ => BAD_DATA,
    }
}

/// Bilinear interpolation from the four surrounding cells.
///
/// Along the grid boundary, corners with zero weight are ignored; any
/// other off-grid, masked or missing corner makes the result missing.
pub fn interp_bilin(dp: &DataPlane, obs_x: f64, obs_y: f64, mask: Option<&MaskPlane>) -> f64 {
    let x = obs_x.floor() as i64;
    let y = obs_y.floor() as i64;
    let dx = obs_x - x as f64;
    let dy = obs_y - y as f64;

    let corners = [
        (x, y, (1.0 - dx) * (1.0 - dy)),
        (x + 1, y, dx * (1.0 - dy)),
        (x, y + 1, (1.0 - dx) * dy),
        (x + 1, y + 1, dx * dy),
    ];

    if let Some(m) = mask {
        let all_on = corners.iter().all(|&(cx, cy, _)| {
            cx >= 0
                && cy >= 0
                && (cx as usize) < m.nx()
                && (cy as usize) < m.ny()
                && m.get(cx as usize, cy as usize)
        });
        if !all_on {
            return BAD_DATA;
        }
    }

    let interior = x >= 0 && y >= 0 && x + 1 < dp.nx() as i64 && y + 1 < dp.ny() as i64;

    let mut sum = 0.0;
    for (cx, cy, w) in corners {
        if !interior && is_eq(w, 0.0, 1e-10) {
            continue;
        }
        match dp.try_get(cx, cy) {
            Some(v) if !is_bad_data(v) => sum += w * v,
            _ => return BAD_DATA,
        }
    }
    sum
}

/// Value of a single cell, missing when off the grid or masked.
pub fn interp_xy(dp: &DataPlane, x: i64, y: i64, mask: Option<&MaskPlane>) -> f64 {
    if let Some(m) = mask {
        if x < 0 || y < 0 || x as usize >= m.nx() || y as usize >= m.ny() {
            return BAD_DATA;
        }
        if !m.get(x as usize, y as usize) {
            return BAD_DATA;
        }
    }
    dp.try_get(x, y).unwrap_or(BAD_DATA)
}

/// Every value of the unclipped neighborhood around a point, in template
/// order, with off-grid cells reported as [`BAD_DATA`].
pub fn interp_points(dp: &DataPlane, gt: &GridTemplate, obs_x: f64, obs_y: f64) -> Vec<f64> {
    let (x, y) = center_cell(obs_x, obs_y, gt.width());
    gt.window(x, y, dp.nx(), dp.ny())
        .all()
        .map(|(cx, cy)| dp.try_get(cx, cy).unwrap_or(BAD_DATA))
        .collect()
}

/// Interpolate a field to a point location.
///
/// `obs_v` is only used by [`InterpMethod::Best`] and `thresh` only by
/// [`InterpMethod::Nbrhd`]. Methods that need more than a single field
/// (least-squares fit, geography match, Gaussian) are rejected.
#[allow(clippy::too_many_arguments)]
pub fn compute_horz_interp(
    dp: &DataPlane,
    obs_x: f64,
    obs_y: f64,
    obs_v: f64,
    method: InterpMethod,
    width: usize,
    shape: GridTemplateShape,
    t: f64,
    thresh: Option<&SingleThresh>,
) -> Result<f64> {
    let gt = GridTemplate::new(shape, width, false)?;
    let (x, y) = center_cell(obs_x, obs_y, width);

    let v = match method {
        InterpMethod::Min => interp_min(dp, &gt, x, y, t, None),
        InterpMethod::Max => interp_max(dp, &gt, x, y, t, None),
        InterpMethod::Median => interp_median(dp, &gt, x, y, t, None),
        InterpMethod::UwMean => interp_uw_mean(dp, &gt, x, y, t, None),
        InterpMethod::DwMean => interp_dw_mean(dp, &gt, obs_x, obs_y, DW_MEAN_POW, t, None),
        InterpMethod::Nbrhd => {
            let thresh = thresh.ok_or_else(|| {
                ProcessorError::config("NBRHD interpolation requires a threshold")
            })?;
            interp_nbrhd(dp, &gt, x, y, t, thresh, None)
        }
        InterpMethod::Bilin => interp_bilin(dp, obs_x, obs_y, None),
        InterpMethod::Nearest => interp_xy(dp, x, y, None),
        InterpMethod::Best => interp_best(dp, &gt, x, y, obs_v, t, None),
        InterpMethod::UpperLeft => {
            interp_xy(dp, obs_x.floor() as i64, obs_y.ceil() as i64, None)
        }
        InterpMethod::UpperRight => {
            interp_xy(dp, obs_x.ceil() as i64, obs_y.ceil() as i64, None)
        }
        InterpMethod::LowerRight => {
            interp_xy(dp, obs_x.ceil() as i64, obs_y.floor() as i64, None)
        }
        InterpMethod::LowerLeft => {
            interp_xy(dp, obs_x.floor() as i64, obs_y.floor() as i64, None)
        }
        InterpMethod::LsFit
        | InterpMethod::Gaussian
        | InterpMethod::MaxGauss
        | InterpMethod::GeogMatch => return Err(ProcessorError::unsupported_method(method)),
    };
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, create_index_field, create_ramp, with_missing};

    fn square(width: usize) -> GridTemplate {
        GridTemplate::new(GridTemplateShape::Square, width, false).unwrap()
    }

    #[test]
    fn test_min_max_mean_interior() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        assert_eq!(interp_min(&field, &gt, 2, 2, 1.0, None), 1.0);
        assert_eq!(interp_max(&field, &gt, 2, 2, 1.0, None), 3.0);
        assert_approx_eq!(interp_uw_mean(&field, &gt, 2, 2, 1.0, None), 2.0, 1e-12);
        assert_approx_eq!(interp_median(&field, &gt, 2, 2, 1.0, None), 2.0, 1e-12);
    }

    #[test]
    fn test_valid_fraction_threshold_at_corner() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        // 4 of 9 cells are on the grid
        assert_eq!(interp_min(&field, &gt, 0, 0, 0.5, None), BAD_DATA);
        assert_eq!(interp_min(&field, &gt, 0, 0, 0.4, None), 0.0);
    }

    #[test]
    fn test_zero_valid_is_missing_even_without_threshold() {
        let field = with_missing(create_ramp(1, 1, 1.0), &[(0, 0)]);
        let gt = square(3);
        assert_eq!(interp_uw_mean(&field, &gt, 0, 0, 0.0, None), BAD_DATA);
        assert_eq!(interp_median(&field, &gt, 0, 0, 0.0, None), BAD_DATA);
        assert_eq!(interp_max(&field, &gt, 0, 0, 0.0, None), BAD_DATA);
    }

    #[test]
    fn test_median_even_count_interpolates() {
        let field = DataPlane::from_vec(2, 2, vec![1.0, 2.0, 3.0, 10.0]).unwrap();
        let gt = square(2);
        assert_approx_eq!(interp_median(&field, &gt, 0, 0, 1.0, None), 2.5, 1e-12);
    }

    #[test]
    fn test_mask_restricts_neighbors() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        let mut mask = MaskPlane::filled(5, 5, true);
        for y in 0..5 {
            mask.set(1, y, false);
        }
        assert_eq!(interp_min(&field, &gt, 2, 2, 0.0, Some(&mask)), 2.0);
        assert_approx_eq!(interp_uw_mean(&field, &gt, 2, 2, 0.0, Some(&mask)), 2.5, 1e-12);
    }

    #[test]
    fn test_nbrhd_fraction() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        let thresh: SingleThresh = ">=2".parse().unwrap();
        assert_approx_eq!(interp_nbrhd(&field, &gt, 2, 2, 1.0, &thresh, None), 2.0 / 3.0, 1e-12);
    }

    #[test]
    fn test_dw_mean_exact_hit_and_symmetry() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        assert_eq!(interp_dw_mean(&field, &gt, 2.0, 2.0, DW_MEAN_POW, 1.0, None), 2.0);
        assert_approx_eq!(interp_dw_mean(&field, &gt, 2.0, 2.4, DW_MEAN_POW, 1.0, None), 2.0, 1e-12);
    }

    #[test]
    fn test_best_picks_closest() {
        let field = create_ramp(5, 5, 1.0);
        let gt = square(3);
        assert_eq!(interp_best(&field, &gt, 2, 2, 2.9, 1.0, None), 3.0);
        assert_eq!(interp_best(&field, &gt, 2, 2, -5.0, 1.0, None), 1.0);
    }

    #[test]
    fn test_bilin() {
        let field = create_index_field(4, 4);
        assert_approx_eq!(interp_bilin(&field, 1.5, 2.25, None), 1502.25, 1e-9);
        // on the last column the zero-weight corners are skipped
        assert_approx_eq!(interp_bilin(&field, 3.0, 1.5, None), 3001.5, 1e-9);
        assert_eq!(interp_bilin(&field, 3.5, 1.5, None), BAD_DATA);

        let holed = with_missing(create_index_field(4, 4), &[(2, 2)]);
        assert_eq!(interp_bilin(&holed, 1.5, 1.5, None), BAD_DATA);
    }

    #[test]
    fn test_interp_points_unclipped() {
        let field = create_index_field(3, 3);
        let points = interp_points(&field, &square(3), 0.2, -0.1);
        assert_eq!(points.len(), 9);
        assert_eq!(points.iter().filter(|v| **v == BAD_DATA).count(), 5);
        assert!(points.contains(&1001.0));
    }

    #[test]
    fn test_center_cell_parity() {
        assert_eq!(center_cell(2.6, 3.4, 3), (3, 3));
        assert_eq!(center_cell(2.6, 3.4, 2), (2, 3));
    }

    #[test]
    fn test_compute_horz_interp_dispatch() {
        let field = create_index_field(5, 5);
        let v = compute_horz_interp(
            &field, 1.4, 2.6, 0.0, InterpMethod::Nearest, 1, GridTemplateShape::Square, 1.0, None,
        )
        .unwrap();
        assert_eq!(v, 1003.0);

        let v = compute_horz_interp(
            &field, 1.4, 2.6, 0.0, InterpMethod::UpperRight, 1, GridTemplateShape::Square, 1.0, None,
        )
        .unwrap();
        assert_eq!(v, 2003.0);

        assert!(matches!(
            compute_horz_interp(
                &field, 1.0, 1.0, 0.0, InterpMethod::LsFit, 3, GridTemplateShape::Square, 1.0, None,
            ),
            Err(ProcessorError::UnsupportedMethod(_))
        ));
        assert!(matches!(
            compute_horz_interp(
                &field, 1.0, 1.0, 0.0, InterpMethod::Nbrhd, 3, GridTemplateShape::Square, 1.0, None,
            ),
            Err(ProcessorError::Config(_))
        ));
    }
}
