//! Tests for polygon membership and grid masks.

use grid_processor::{
    parse_latlon_poly_str, parse_xy_poly_str, polygon_mask, xy_polygon_mask, ClosedPolygon,
    LatLonPolygon, Polygon,
};
use projection::{Grid, GridProjection};
use test_utils::{grid_spec, polygon};

// ============================================================================
// Membership tests
// ============================================================================

#[test]
fn test_square_inside_outside() {
    let square = Polygon::from_points("square", polygon::SQUARE_10);
    assert!(square.is_inside(5.0, 5.0));
    assert!(!square.is_inside(20.0, 20.0));
}

#[test]
fn test_winding_order_does_not_matter() {
    let cw = Polygon::from_points("cw", polygon::L_SHAPE);
    let ccw = Polygon::from_points("ccw", polygon::L_SHAPE.iter().rev().copied());
    for (u, v) in [(1.0, 1.0), (4.0, 4.0), (5.5, 1.5), (1.5, 5.5), (-1.0, 3.0)] {
        assert_eq!(cw.is_inside(u, v), ccw.is_inside(u, v), "({}, {})", u, v);
    }
}

#[test]
fn test_bbox_precheck_never_changes_result() {
    let mut star = Polygon::new("star");
    for k in 0..10 {
        let r = if k % 2 == 0 { 10.0 } else { 4.0 };
        let a = std::f64::consts::PI * k as f64 / 5.0;
        star.add_point(r * a.cos(), r * a.sin());
    }
    let closed = ClosedPolygon::from(star.clone());

    for i in -60..=60 {
        for j in -60..=60 {
            let (u, v) = (i as f64 * 0.25, j as f64 * 0.25);
            assert_eq!(star.is_inside(u, v), closed.is_inside(u, v), "({}, {})", u, v);
        }
    }
}

#[test]
fn test_antimeridian_box_both_sides() {
    let dateline = LatLonPolygon::from_latlon(
        "dateline",
        polygon::DATELINE_BOX.iter().map(|&(lon, lat)| (lat, lon)),
    );
    assert!(dateline.is_inside(0.0, 179.5));
    assert!(dateline.is_inside(0.0, -179.5));
    assert!(dateline.is_inside(-5.0, 172.0));
    assert!(dateline.is_inside(5.0, -172.0));
    assert!(!dateline.is_inside(0.0, 168.0));
    assert!(!dateline.is_inside(0.0, -168.0));
    assert!(!dateline.is_inside(0.0, 0.0));
}

#[test]
fn test_narrow_polygon_is_not_shifted() {
    let poly = parse_latlon_poly_str("CONUS 25 -125 50 -125 50 -65 25 -65", false).unwrap();
    assert_eq!(poly.lon_shift(), 0.0);
    assert!(poly.is_inside(40.0, -100.0));
    assert!(!poly.is_inside(40.0, 100.0));
}

// ============================================================================
// Mask tests
// ============================================================================

#[test]
fn test_latlon_polygon_mask_on_latlon_grid() {
    let grid = Grid::from_spec(grid_spec::LATLON_5X5, false).unwrap();
    let poly = parse_latlon_poly_str("BOX 0.5 0.5 0.5 2.5 2.5 2.5 2.5 0.5", false).unwrap();

    let mask = polygon_mask(&grid, &poly).unwrap();
    assert_eq!((mask.nx(), mask.ny()), (grid.nx(), grid.ny()));
    assert_eq!(mask.count_on(), 4);
    for (x, y) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
        assert!(mask.get(x, y));
    }
    assert!(!mask.get(0, 0));
    assert!(!mask.get(3, 3));
}

#[test]
fn test_polygon_mask_on_projected_grid() {
    let grid = Grid::from_spec(grid_spec::LAMBERT_G212, false).unwrap();
    let poly = parse_latlon_poly_str("BOX 30 -105 45 -105 45 -85 30 -85", false).unwrap();
    let mask = polygon_mask(&grid, &poly).unwrap();

    assert!(mask.count_on() > 0);
    for y in (0..grid.ny()).step_by(7) {
        for x in (0..grid.nx()).step_by(7) {
            let (lat, lon) = grid.xy_to_latlon(x as f64, y as f64);
            let inside = (30.0..=45.0).contains(&lat) && (-105.0..=-85.0).contains(&lon);
            // skip cells within a hair of the outline
            let near_edge = [lat - 30.0, lat - 45.0, lon + 105.0, lon + 85.0]
                .iter()
                .any(|d| d.abs() < 1e-6);
            if !near_edge {
                assert_eq!(mask.get(x, y), inside, "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn test_xy_polygon_mask() {
    let tri = parse_xy_poly_str("TRI -0.5 -0.5 5 -0.5 -0.5 5").unwrap();
    let mask = xy_polygon_mask(6, 6, &tri).unwrap();
    // hypotenuse x + y = 4.5 passes between cell centers
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(mask.get(x, y), x + y <= 4, "({}, {})", x, y);
        }
    }
}
