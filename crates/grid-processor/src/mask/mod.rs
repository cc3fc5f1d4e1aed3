//! Polygon masks over grids.

mod polygon;

pub use polygon::{
    min_dist_to_segment, parse_latlon_poly_file, parse_latlon_poly_str, parse_xy_poly_file,
    parse_xy_poly_str, point_dist, polygon_distance, segments_intersect, ClosedPolygon,
    LatLonPolygon, Polygon,
};

use projection::GridProjection;
use rayon::prelude::*;
use tracing::debug;
use vx_common::{is_bad_data, MaskPlane};

use crate::error::Result;

/// Mask of the grid cells whose centers fall inside a lat/lon polygon.
///
/// Cells whose location cannot be computed are off.
pub fn polygon_mask<G>(grid: &G, poly: &LatLonPolygon) -> Result<MaskPlane>
where
    G: GridProjection + Sync + ?Sized,
{
    let (nx, ny) = (grid.nx(), grid.ny());
    debug!(
        grid = grid.name(),
        polygon = poly.name(),
        nx,
        ny,
        "Applying polygon mask"
    );

    let flags: Vec<bool> = (0..nx * ny)
        .into_par_iter()
        .map(|n| {
            let (x, y) = ((n % nx) as f64, (n / nx) as f64);
            let (lat, lon) = grid.xy_to_latlon(x, y);
            !is_bad_data(lat) && !is_bad_data(lon) && poly.is_inside(lat, lon)
        })
        .collect();

    let mask = MaskPlane::from_vec(nx, ny, flags)?;
    debug!(n_on = mask.count_on(), "Polygon mask complete");
    Ok(mask)
}

/// Mask of the cells of an `nx` by `ny` grid inside a polygon given in
/// grid units.
pub fn xy_polygon_mask(nx: usize, ny: usize, poly: &ClosedPolygon) -> Result<MaskPlane> {
    let flags: Vec<bool> = (0..nx * ny)
        .into_par_iter()
        .map(|n| poly.is_inside((n % nx) as f64, (n / nx) as f64))
        .collect();
    Ok(MaskPlane::from_vec(nx, ny, flags)?)
}
