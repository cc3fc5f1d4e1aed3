//! Exact Euclidean distance transform (Meijster, Roerdink and Hesselink).
//!
//! Cells with a valid value greater than zero are events. The output holds
//! the distance in grid units from every cell to the nearest event. The
//! first phase computes, per column, the vertical distance to the nearest
//! event in that column. The second phase scans each row, building the
//! lower envelope of the parabolas `(x - i)^2 + g(i)^2` with a stack. All
//! arithmetic before the final square root is exact integer arithmetic.

use rayon::prelude::*;
use tracing::{debug, warn};
use vx_common::{is_bad_data, DataPlane, BAD_DATA};

fn is_event(v: f64) -> bool {
    !is_bad_data(v) && v > 0.0
}

/// Distance from every cell to the nearest event cell.
///
/// Cells that are missing in the input are missing in the output. A field
/// without events is filled with `nx + ny`.
pub fn distance_map(dp: &DataPlane) -> DataPlane {
    let (nx, ny) = dp.dims();
    let mut out = dp.clone();
    if nx == 0 || ny == 0 {
        return out;
    }

    let n_events = dp.data().iter().filter(|v| is_event(**v)).count();
    debug!(nx, ny, n_events, "Computing distance map");

    // finite stand-in for infinity, larger than any real distance
    let max_dist = (nx + ny) as i64;

    if n_events == 0 {
        warn!(nx, ny, "no events found, filling distance map with {}", max_dist);
        out.set_constant(max_dist as f64);
    } else {
        let g: Vec<Vec<i64>> = (0..nx)
            .into_par_iter()
            .map(|x| column_distances(dp, x, max_dist))
            .collect();

        out.data_mut()
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(y, row)| row_distances(&g, y, row));
    }

    for (o, v) in out.data_mut().iter_mut().zip(dp.data()) {
        if is_bad_data(*v) {
            *o = BAD_DATA;
        }
    }
    out
}

/// Phase 1: vertical distance to the nearest event in column `x`.
fn column_distances(dp: &DataPlane, x: usize, max_dist: i64) -> Vec<i64> {
    let ny = dp.ny();
    let mut g = vec![0i64; ny];

    g[0] = if is_event(dp.get(x, 0)) { 0 } else { max_dist };
    for y in 1..ny {
        g[y] = if is_event(dp.get(x, y)) { 0 } else { 1 + g[y - 1] };
    }
    for y in (0..ny.saturating_sub(1)).rev() {
        if g[y + 1] < g[y] {
            g[y] = 1 + g[y + 1];
        }
    }
    g
}

/// Phase 2: squared distances along row `y` from the column distances,
/// written to `row` as distances.
fn row_distances(g: &[Vec<i64>], y: usize, row: &mut [f64]) {
    let nx = row.len() as i64;
    let gy = |i: i64| g[i as usize][y];
    let f = |x: i64, i: i64| (x - i) * (x - i) + gy(i) * gy(i);
    // abscissa from which parabola u lies below parabola i (i < u)
    let sep = |i: i64, u: i64| {
        (u * u - i * i + gy(u) * gy(u) - gy(i) * gy(i)).div_euclid(2 * (u - i))
    };

    let mut s: Vec<i64> = Vec::with_capacity(row.len());
    let mut t: Vec<i64> = Vec::with_capacity(row.len());
    s.push(0);
    t.push(0);

    for u in 1..nx {
        while let (Some(&sq), Some(&tq)) = (s.last(), t.last()) {
            if f(tq, sq) > f(tq, u) {
                s.pop();
                t.pop();
            } else {
                break;
            }
        }
        match s.last() {
            None => {
                s.push(u);
                t.push(0);
            }
            Some(&sq) => {
                let w = 1 + sep(sq, u);
                if w < nx {
                    s.push(u);
                    t.push(w);
                }
            }
        }
    }

    for u in (0..nx).rev() {
        let (Some(&sq), Some(&tq)) = (s.last(), t.last()) else {
            break;
        };
        row[u as usize] = (f(u, sq) as f64).sqrt();
        if u == tq {
            s.pop();
            t.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, create_constant_field, create_single_event, with_missing};

    #[test]
    fn test_single_event_at_origin() {
        let field = create_single_event(12, 9, 0, 0);
        let dist = distance_map(&field);
        for y in 0..9 {
            for x in 0..12 {
                assert_eq!(dist.get(x, y), ((x * x + y * y) as f64).sqrt());
            }
        }
    }

    #[test]
    fn test_two_events_take_nearest() {
        let mut field = create_single_event(11, 1, 0, 0);
        field.set(10, 0, 3.0);
        let dist = distance_map(&field);
        let expected = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
        assert_eq!(dist.data(), &expected);
    }

    #[test]
    fn test_no_events_fills_with_max() {
        let field = create_constant_field(4, 3, 0.0);
        let dist = distance_map(&field);
        assert!(dist.data().iter().all(|v| *v == 7.0));
    }

    #[test]
    fn test_missing_cells_are_masked() {
        let field = with_missing(create_single_event(5, 5, 2, 2), &[(0, 0), (4, 1)]);
        let dist = distance_map(&field);
        assert_eq!(dist.get(0, 0), BAD_DATA);
        assert_eq!(dist.get(4, 1), BAD_DATA);
        assert_approx_eq!(dist.get(4, 4), 8f64.sqrt(), 1e-12);
    }

    #[test]
    fn test_all_missing_stays_missing() {
        let field = with_missing(
            create_constant_field(2, 2, 1.0),
            &[(0, 0), (1, 0), (0, 1), (1, 1)],
        );
        let dist = distance_map(&field);
        assert!(dist.data().iter().all(|v| *v == BAD_DATA));
    }

    #[test]
    fn test_negative_values_are_not_events() {
        let mut field = create_constant_field(3, 1, -2.0);
        field.set(2, 0, 0.1);
        let dist = distance_map(&field);
        assert_eq!(dist.data(), &[2.0, 1.0, 0.0]);
    }
}
