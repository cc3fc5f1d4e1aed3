//! Tests for neighborhood templates, smoothing and fractional coverage.

use std::collections::BTreeSet;

use grid_processor::interp::interp_nbrhd;
use grid_processor::{
    fractional_coverage, fractional_coverage_square, smooth_field, GridTemplate,
    GridTemplateShape, InterpMethod, SmoothParams,
};
use test_utils::{
    assert_planes_approx_eq, create_checkerboard, create_random_field, create_ramp,
};
use vx_common::{SingleThresh, ThreshOp};

fn cells(iter: impl Iterator<Item = (usize, usize)>) -> BTreeSet<(usize, usize)> {
    iter.collect()
}

fn all_templates() -> Vec<GridTemplate> {
    let mut templates = Vec::new();
    for width in [1, 3, 4, 5, 6, 7] {
        templates.push(GridTemplate::new(GridTemplateShape::Square, width, false).unwrap());
        templates.push(GridTemplate::new(GridTemplateShape::Circle, width, false).unwrap());
    }
    templates
}

// ============================================================================
// Template enumeration tests
// ============================================================================

#[test]
fn test_full_enumeration_has_no_repeats() {
    for gt in all_templates() {
        let window = gt.window(10, 10, 21, 21);
        let listed: Vec<_> = window.in_grid().collect();
        let unique = cells(window.in_grid());
        assert_eq!(listed.len(), unique.len(), "{}", gt);
        assert_eq!(listed.len(), gt.size(), "{}", gt);
    }
}

#[test]
fn test_clipped_enumeration_is_smaller() {
    for gt in all_templates().into_iter().filter(|gt| gt.width() > 1) {
        let n = gt.window(20, 20, 21, 21).in_grid().count();
        assert!(n < gt.size(), "{}", gt);
        assert!(n > 0, "{}", gt);
    }
}

#[test]
fn test_vertical_edges_partition_the_slide() {
    for gt in all_templates() {
        let mut window = gt.window(10, 8, 21, 21);
        let before = cells(window.in_grid());
        let leaving = cells(window.bottom_edge());
        window.inc_base_y(1).unwrap();
        let after = cells(window.in_grid());
        let entering = cells(window.top_edge());

        let removed: BTreeSet<_> = before.difference(&after).copied().collect();
        let added: BTreeSet<_> = after.difference(&before).copied().collect();
        assert_eq!(removed, leaving, "{}", gt);
        assert_eq!(added, entering, "{}", gt);
    }
}

#[test]
fn test_horizontal_edges_partition_the_slide() {
    for gt in all_templates() {
        let mut window = gt.window(8, 10, 21, 21);
        let before = cells(window.in_grid());
        let leaving = cells(window.left_edge());
        window.inc_base_x(1).unwrap();
        let after = cells(window.in_grid());
        let entering = cells(window.right_edge());

        let removed: BTreeSet<_> = before.difference(&after).copied().collect();
        let added: BTreeSet<_> = after.difference(&before).copied().collect();
        assert_eq!(removed, leaving, "{}", gt);
        assert_eq!(added, entering, "{}", gt);
    }
}

#[test]
fn test_slide_off_grid_is_error() {
    let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
    let mut window = gt.window(4, 4, 5, 5);
    assert!(window.inc_base_y(1).is_err());
    assert!(window.inc_base_x(1).is_err());
    assert_eq!(window.base(), (4, 4));
}

// ============================================================================
// Fractional coverage tests
// ============================================================================

#[test]
fn test_square_coverage_matches_template_on_checkerboard() {
    let field = create_checkerboard(10, 10);
    let thresh = SingleThresh::new(ThreshOp::Gt, 0.5);

    let general =
        fractional_coverage(&field, 3, GridTemplateShape::Square, false, &thresh, 0.0).unwrap();
    let square = fractional_coverage_square(&field, 3, &thresh, 0.0).unwrap();

    assert_planes_approx_eq!(&general, &square, 1e-12);
}

#[test]
fn test_square_coverage_matches_template_with_missing_data() {
    let field = create_random_field(23, 17, 0.4, 0.15, 7);
    let thresh = SingleThresh::new(ThreshOp::Ge, 5.0);

    for width in [1, 2, 3, 4, 5, 8] {
        let general =
            fractional_coverage(&field, width, GridTemplateShape::Square, false, &thresh, 0.5)
                .unwrap();
        let square = fractional_coverage_square(&field, width, &thresh, 0.5).unwrap();
        assert_planes_approx_eq!(&general, &square, 1e-12);
    }
}

#[test]
fn test_incremental_coverage_matches_per_cell() {
    let field = create_random_field(19, 21, 0.3, 0.1, 99);
    let thresh = SingleThresh::new(ThreshOp::Gt, 0.0);

    for shape in [GridTemplateShape::Circle, GridTemplateShape::Square] {
        for width in [3, 5, 6] {
            let gt = GridTemplate::new(shape, width, false).unwrap();
            let fast = fractional_coverage(&field, width, shape, false, &thresh, 0.25).unwrap();
            for y in 0..field.ny() {
                for x in 0..field.nx() {
                    let naive =
                        interp_nbrhd(&field, &gt, x as i64, y as i64, 0.25, &thresh, None);
                    assert_eq!(fast.get(x, y), naive, "{} at ({}, {})", gt, x, y);
                }
            }
        }
    }
}

// ============================================================================
// Smoothing tests
// ============================================================================

#[test]
fn test_nearest_width_one_is_identity() {
    let field = create_random_field(12, 9, 0.5, 0.2, 3);
    let params = SmoothParams {
        method: InterpMethod::Nearest,
        width: 1,
        ..SmoothParams::default()
    };
    assert_eq!(smooth_field(&field, &params).unwrap(), field);
}

#[test]
fn test_smoothing_matches_per_cell_median() {
    let field = create_random_field(15, 11, 0.6, 0.1, 11);
    let params = SmoothParams {
        method: InterpMethod::Median,
        width: 5,
        shape: GridTemplateShape::Circle,
        vld_thresh: 0.3,
        ..SmoothParams::default()
    };
    let smoothed = smooth_field(&field, &params).unwrap();

    let gt = GridTemplate::new(GridTemplateShape::Circle, 5, false).unwrap();
    for y in 0..field.ny() {
        for x in 0..field.nx() {
            let expected =
                grid_processor::interp::interp_median(&field, &gt, x as i64, y as i64, 0.3, None);
            assert_eq!(smoothed.get(x, y), expected);
        }
    }
}

#[test]
fn test_wrap_lon_only_changes_edge_columns() {
    // a ramp is not periodic, so wrapping changes the edge columns only
    let field = create_ramp(10, 4, 1.0);
    let plain = SmoothParams {
        method: InterpMethod::UwMean,
        width: 3,
        vld_thresh: 0.0,
        ..SmoothParams::default()
    };
    let wrapped = SmoothParams {
        wrap_lon: true,
        ..plain
    };
    let a = smooth_field(&field, &plain).unwrap();
    let b = smooth_field(&field, &wrapped).unwrap();
    for y in 0..4 {
        for x in 1..9 {
            assert_eq!(a.get(x, y), b.get(x, y));
        }
        // neighbors 9, 0, 1
        assert!((b.get(0, y) - 10.0 / 3.0).abs() < 1e-12);
    }
}
