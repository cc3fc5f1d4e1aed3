//! Polygons in grid or longitude/latitude coordinates.
//!
//! Membership uses the winding number: the signed angles subtended by each
//! edge at the test point are summed and a point is inside when the sum is
//! a nonzero number of full turns. Points exactly on an edge or vertex have
//! no defined classification.

use std::path::Path;

use projection::rescale_lon;
use vx_common::BoundingBox;

use crate::error::{ProcessorError, Result};

/// Tolerance for treating two vertices as the same point.
const VERTEX_TOL: f64 = 1.0e-4;

/// An ordered list of `(u, v)` vertices. The last vertex connects back to
/// the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    name: String,
    points: Vec<(f64, f64)>,
}

impl Polygon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn from_points<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self {
            name: name.into(),
            points: points.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn add_point(&mut self, u: f64, v: f64) {
        self.points.push((u, v));
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// An empty polygon is closed; otherwise the first and last of at least
    /// three vertices must coincide.
    pub fn is_closed(&self) -> bool {
        match self.points.len() {
            0 => true,
            1 | 2 => false,
            n => {
                let (u0, v0) = self.points[0];
                let (un, vn) = self.points[n - 1];
                (un - u0).abs() + (vn - v0).abs() < VERTEX_TOL
            }
        }
    }

    /// Shoelace area, positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        0.5 * self
            .edges()
            .map(|((u0, v0), (u1, v1))| u0 * v1 - v0 * u1)
            .sum::<f64>()
    }

    /// Area centroid. Undefined for a polygon with zero area.
    pub fn centroid(&self) -> (f64, f64) {
        let mut sum_u = 0.0;
        let mut sum_v = 0.0;
        for ((u0, v0), (u1, v1)) in self.edges() {
            sum_u += (u0 * u0 + u0 * u1 + u1 * u1) * (v1 - v0);
            sum_v -= (v0 * v0 + v0 * v1 + v1 * v1) * (u1 - u0);
        }
        let area = self.signed_area();
        (sum_u / 6.0 / area, sum_v / 6.0 / area)
    }

    /// Orientation of the principal axis in degrees, from the second
    /// moments about the centroid.
    pub fn angle(&self) -> Result<f64> {
        if self.points.len() < 3 {
            return Err(ProcessorError::config(format!(
                "polygon '{}' needs at least 3 points for an angle",
                self.name
            )));
        }
        let (ubar, vbar) = self.centroid();
        let (mut ixx, mut ixy, mut iyy) = (0.0, 0.0, 0.0);
        for ((u0, v0), (u1, v1)) in self.edges() {
            let (x0, y0, x1, y1) = (u0 - ubar, v0 - vbar, u1 - ubar, v1 - vbar);
            ixx += (x0 * x0 * x0 + x0 * x0 * x1 + x0 * x1 * x1 + x1 * x1 * x1) * (y1 - y0);
            iyy -= (y0 * y0 * y0 + y0 * y0 * y1 + y0 * y1 * y1 + y1 * y1 * y1) * (x1 - x0);
            ixy += (x0 * (2.0 * y0 + y1) + x1 * (2.0 * y1 + y0)) * (x0 * y1 - x1 * y0);
        }
        let area = self.signed_area();
        ixx /= 12.0 * area;
        iyy /= 12.0 * area;
        ixy /= 24.0 * area;
        Ok(0.5 * (2.0 * ixy).atan2(ixx - iyy).to_degrees())
    }

    pub fn translate(&mut self, du: f64, dv: f64) {
        for (u, v) in &mut self.points {
            *u += du;
            *v += dv;
        }
    }

    /// Rotate counter-clockwise about the centroid.
    pub fn rotate(&mut self, deg: f64) {
        let (ubar, vbar) = self.centroid();
        self.rotate_about(deg, ubar, vbar);
    }

    /// Rotate counter-clockwise about `(ubar, vbar)`.
    pub fn rotate_about(&mut self, deg: f64, ubar: f64, vbar: f64) {
        let (s, c) = deg.to_radians().sin_cos();
        for (u, v) in &mut self.points {
            let x = *u - ubar;
            let y = *v - vbar;
            *u = ubar + x * c - y * s;
            *v = vbar + x * s + y * c;
        }
    }

    /// Winding-number membership test.
    pub fn is_inside(&self, u: f64, v: f64) -> bool {
        if self.points.is_empty() {
            return false;
        }
        let turns: f64 = self
            .edges()
            .map(|((u0, v0), (u1, v1))| {
                let (a, b) = (u0 - u, v0 - v);
                let (c, d) = (u1 - u, v1 - v);
                (a * d - b * c).atan2(a * c + b * d) / std::f64::consts::PI
            })
            .sum();
        (turns / 2.0).round() as i64 != 0
    }

    /// Whether `(u, v)` is one of the vertices.
    pub fn is_vertex(&self, u: f64, v: f64) -> bool {
        self.points
            .iter()
            .any(|&(pu, pv)| (pu - u).abs() < VERTEX_TOL && (pv - v).abs() < VERTEX_TOL)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter().copied())
    }
}

/// A polygon with a cached bounding box used to reject far points before
/// the winding test.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolygon {
    poly: Polygon,
    bbox: BoundingBox,
}

impl ClosedPolygon {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from(Polygon::new(name))
    }

    pub fn add_point(&mut self, u: f64, v: f64) {
        self.poly.add_point(u, v);
        self.bbox.extend(u, v);
    }

    pub fn polygon(&self) -> &Polygon {
        &self.poly
    }

    pub fn name(&self) -> &str {
        self.poly.name()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn is_inside(&self, u: f64, v: f64) -> bool {
        self.bbox.contains_point(u, v) && self.poly.is_inside(u, v)
    }
}

impl From<Polygon> for ClosedPolygon {
    fn from(poly: Polygon) -> Self {
        let bbox = poly.bounding_box();
        Self { poly, bbox }
    }
}

/// A polygon of latitude/longitude vertices, longitudes in degrees east.
///
/// Outlines spanning more than 180 degrees of longitude are taken to cross
/// the antimeridian. Their longitudes are stored shifted by 180 degrees and
/// queries are shifted the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct LatLonPolygon {
    shape: ClosedPolygon,
    lon_shift: f64,
}

impl LatLonPolygon {
    /// Build from `(lat, lon)` vertices.
    pub fn from_latlon<I>(name: impl Into<String>, vertices: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let vertices: Vec<(f64, f64)> = vertices
            .into_iter()
            .map(|(lat, lon)| (lat, rescale_lon(lon)))
            .collect();

        let (min_lon, max_lon) = vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, lon)| {
                (lo.min(lon), hi.max(lon))
            });
        let lon_shift = if max_lon - min_lon > 180.0 { 180.0 } else { 0.0 };

        let mut shape = ClosedPolygon::new(name);
        for (lat, lon) in vertices {
            shape.add_point(rescale_lon(lon + lon_shift), lat);
        }
        Self { shape, lon_shift }
    }

    pub fn name(&self) -> &str {
        self.shape.name()
    }

    pub fn n_points(&self) -> usize {
        self.shape.polygon().n_points()
    }

    /// Longitude shift applied to stored vertices and queries.
    pub fn lon_shift(&self) -> f64 {
        self.lon_shift
    }

    /// Stored outline, `u` = shifted longitude and `v` = latitude.
    pub fn shape(&self) -> &ClosedPolygon {
        &self.shape
    }

    pub fn is_inside(&self, lat: f64, lon: f64) -> bool {
        self.shape.is_inside(rescale_lon(lon + self.lon_shift), lat)
    }
}

fn split_name_and_pairs(s: &str) -> Result<(String, Vec<(f64, f64)>)> {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() < 7 || tokens.len() % 2 != 1 {
        return Err(ProcessorError::config(format!(
            "polygon string ({}) must begin with a name and contain at least 3 pairs of points",
            s.trim()
        )));
    }
    let values = parse_numbers(&tokens[1..])?;
    Ok((tokens[0].to_string(), pairs(&values)))
}

fn parse_numbers(tokens: &[&str]) -> Result<Vec<f64>> {
    tokens
        .iter()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| ProcessorError::config(format!("invalid polygon coordinate '{}'", t)))
        })
        .collect()
}

fn pairs(values: &[f64]) -> Vec<(f64, f64)> {
    values.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}

fn flip_west(pairs: Vec<(f64, f64)>, west_longitude_positive: bool) -> Vec<(f64, f64)> {
    if west_longitude_positive {
        pairs.into_iter().map(|(lat, lon)| (lat, -lon)).collect()
    } else {
        pairs
    }
}

/// Parse `"NAME lat lon lat lon ..."`.
pub fn parse_latlon_poly_str(s: &str, west_longitude_positive: bool) -> Result<LatLonPolygon> {
    let (name, pairs) = split_name_and_pairs(s)?;
    Ok(LatLonPolygon::from_latlon(
        name,
        flip_west(pairs, west_longitude_positive),
    ))
}

/// Parse `"NAME x y x y ..."` in grid units.
pub fn parse_xy_poly_str(s: &str) -> Result<ClosedPolygon> {
    let (name, pairs) = split_name_and_pairs(s)?;
    Ok(ClosedPolygon::from(Polygon::from_points(name, pairs)))
}

/// Read a file holding a name followed by whitespace-separated pairs.
fn read_poly_file(path: &Path) -> Result<(String, Vec<(f64, f64)>)> {
    let text = std::fs::read_to_string(path)?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((name, rest)) = tokens.split_first() else {
        return Err(ProcessorError::config(format!(
            "polygon file {} is empty",
            path.display()
        )));
    };
    let values = parse_numbers(rest)?;
    // a trailing unpaired value is ignored
    let pairs = pairs(&values);
    if pairs.len() < 3 {
        return Err(ProcessorError::config(format!(
            "polygon file {} must contain at least 3 pairs of points",
            path.display()
        )));
    }
    Ok((name.to_string(), pairs))
}

/// Read a lat/lon polygon file.
pub fn parse_latlon_poly_file(
    path: impl AsRef<Path>,
    west_longitude_positive: bool,
) -> Result<LatLonPolygon> {
    let (name, pairs) = read_poly_file(path.as_ref())?;
    Ok(LatLonPolygon::from_latlon(
        name,
        flip_west(pairs, west_longitude_positive),
    ))
}

/// Read a grid x/y polygon file.
pub fn parse_xy_poly_file(path: impl AsRef<Path>) -> Result<ClosedPolygon> {
    let (name, pairs) = read_poly_file(path.as_ref())?;
    Ok(ClosedPolygon::from(Polygon::from_points(name, pairs)))
}

// ============================================================================
// Segment and outline distances
// ============================================================================

pub fn point_dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x1 - x2).hypot(y1 - y2)
}

/// Whether segments `p1-p2` and `p3-p4` share a point. Collinear segments
/// intersect when they overlap.
pub fn segments_intersect(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), p4: (f64, f64)) -> bool {
    let ((x1, y1), (x2, y2), (x3, y3), (x4, y4)) = (p1, p2, p3, p4);
    let ua_num = (x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3);
    let ub_num = (x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3);
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    let zero = |v: f64| v.abs() < 1.0e-10;

    if zero(denom) {
        if !(zero(ua_num) && zero(ub_num)) {
            return false;
        }
        // collinear: overlap if either end of the first lies on the second
        let dx = (x3 - x4).abs();
        let dy = (y3 - y4).abs();
        let on_second = |x: f64, y: f64| {
            (x - x3).abs() <= dx && (x - x4).abs() <= dx && (y - y3).abs() <= dy && (y - y4).abs() <= dy
        };
        return on_second(x1, y1) || on_second(x2, y2);
    }

    let ua = ua_num / denom;
    let ub = ub_num / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Shortest distance from `test` to the segment `p-q`.
pub fn min_dist_to_segment(p: (f64, f64), q: (f64, f64), test: (f64, f64)) -> f64 {
    let (qmpx, qmpy) = (q.0 - p.0, q.1 - p.1);
    let (rmpx, rmpy) = (test.0 - p.0, test.1 - p.1);
    let qmp = qmpx.hypot(qmpy);

    if qmp.abs() < 1.0e-10 {
        return point_dist(test.0, test.1, q.0, q.1);
    }

    let (cx, cy) = (qmpx / qmp, qmpy / qmp);
    let t0 = rmpx * cx + rmpy * cy;
    if t0 < 0.0 {
        return rmpx.hypot(rmpy);
    }
    if t0 > qmp {
        return point_dist(test.0, test.1, q.0, q.1);
    }
    (rmpx - t0 * cx).hypot(rmpy - t0 * cy)
}

/// Distance between two outlines. Zero when either contains a vertex of
/// the other or their edges cross.
pub fn polygon_distance(a: &Polygon, b: &Polygon) -> f64 {
    if a.points.iter().any(|&(u, v)| b.is_inside(u, v))
        || b.points.iter().any(|&(u, v)| a.is_inside(u, v))
    {
        return 0.0;
    }

    if a.edges()
        .any(|(p1, p2)| b.edges().any(|(p3, p4)| segments_intersect(p1, p2, p3, p4)))
    {
        return 0.0;
    }

    let one_way = |from: &Polygon, to: &Polygon| {
        from.points
            .iter()
            .flat_map(move |&pt| to.edges().map(move |(p, q)| min_dist_to_segment(p, q, pt)))
            .fold(f64::INFINITY, f64::min)
    };
    one_way(a, b).min(one_way(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq, polygon};

    fn square() -> Polygon {
        Polygon::from_points("square", polygon::SQUARE_10)
    }

    #[test]
    fn test_square_membership() {
        let sq = square();
        assert!(sq.is_inside(5.0, 5.0));
        assert!(!sq.is_inside(20.0, 20.0));
        assert!(!sq.is_inside(-0.5, 5.0));
        assert!(!Polygon::new("empty").is_inside(0.0, 0.0));
    }

    #[test]
    fn test_concave_membership() {
        let l = Polygon::from_points("L", polygon::L_SHAPE);
        assert!(l.is_inside(1.0, 1.0));
        assert!(l.is_inside(1.0, 5.0));
        assert!(l.is_inside(5.0, 1.0));
        assert!(!l.is_inside(4.0, 4.0));
    }

    #[test]
    fn test_area_and_centroid() {
        let sq = square();
        // clockwise vertex order
        assert_approx_eq!(sq.signed_area(), -100.0, 1e-12);
        assert_coords_approx_eq!(sq.centroid(), (5.0, 5.0), 1e-12);
    }

    #[test]
    fn test_is_closed() {
        assert!(Polygon::new("empty").is_closed());
        assert!(!Polygon::from_points("p", [(0.0, 0.0), (0.0, 0.0)]).is_closed());
        assert!(!square().is_closed());
        let mut sq = square();
        sq.add_point(0.0, 0.00001);
        assert!(sq.is_closed());
    }

    #[test]
    fn test_translate_and_rotate() {
        let mut sq = square();
        sq.translate(-5.0, -5.0);
        assert!(sq.is_inside(0.0, 0.0));
        assert_coords_approx_eq!(sq.centroid(), (0.0, 0.0), 1e-12);

        let mut bar = Polygon::from_points("bar", [(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (0.0, 1.0)]);
        assert_approx_eq!(bar.angle().unwrap(), 0.0, 1e-9);
        bar.rotate(90.0);
        assert_coords_approx_eq!(bar.centroid(), (2.0, 0.5), 1e-9);
        assert!(bar.is_inside(2.0, 2.0));
        assert!(!bar.is_inside(3.5, 0.5));
        assert_approx_eq!(bar.angle().unwrap().abs(), 90.0, 1e-9);
    }

    #[test]
    fn test_vertex_and_bbox() {
        let sq = square();
        assert!(sq.is_vertex(10.0, 10.0));
        assert!(!sq.is_vertex(5.0, 5.0));
        let bbox = sq.bounding_box();
        assert_eq!((bbox.min_x, bbox.max_y), (0.0, 10.0));
    }

    #[test]
    fn test_closed_polygon_matches_polygon() {
        let l = Polygon::from_points("L", polygon::L_SHAPE);
        let closed = ClosedPolygon::from(l.clone());
        for i in -20..100 {
            for j in -20..100 {
                let (u, v) = (i as f64 * 0.1 + 0.05, j as f64 * 0.1 + 0.05);
                assert_eq!(l.is_inside(u, v), closed.is_inside(u, v), "({}, {})", u, v);
            }
        }
    }

    #[test]
    fn test_antimeridian_polygon() {
        let poly = LatLonPolygon::from_latlon(
            "dateline",
            polygon::DATELINE_BOX.iter().map(|&(lon, lat)| (lat, lon)),
        );
        assert_eq!(poly.lon_shift(), 180.0);
        assert!(poly.is_inside(0.0, 175.0));
        assert!(poly.is_inside(0.0, -175.0));
        assert!(poly.is_inside(5.0, 180.0));
        assert!(!poly.is_inside(0.0, 0.0));
        assert!(!poly.is_inside(0.0, 160.0));
        assert!(!poly.is_inside(20.0, 175.0));
    }

    #[test]
    fn test_parse_latlon_poly_str() {
        let poly = parse_latlon_poly_str("BOX 30 -100 40 -100 40 -90 30 -90", false).unwrap();
        assert_eq!(poly.name(), "BOX");
        assert_eq!(poly.n_points(), 4);
        assert_eq!(poly.lon_shift(), 0.0);
        assert!(poly.is_inside(35.0, -95.0));

        let west = parse_latlon_poly_str("BOX 30 100 40 100 40 90 30 90", true).unwrap();
        assert!(west.is_inside(35.0, -95.0));
    }

    #[test]
    fn test_parse_poly_str_errors() {
        assert!(matches!(
            parse_xy_poly_str("TRI 0 0 1 1"),
            Err(ProcessorError::Config(_))
        ));
        assert!(parse_xy_poly_str("TRI 0 0 1 1 2 0 5").is_err());
        assert!(parse_xy_poly_str("TRI 0 0 1 one 2 0").is_err());
        let tri = parse_xy_poly_str("TRI 0 0 4 0 0 4").unwrap();
        assert!(tri.is_inside(1.0, 1.0));
    }

    #[test]
    fn test_parse_poly_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "KANSAS").unwrap();
        writeln!(file, "37.0 -102.0\n40.0 -102.0\n40.0 -94.6\n37.0 -94.6").unwrap();
        let poly = parse_latlon_poly_file(file.path(), false).unwrap();
        assert_eq!(poly.name(), "KANSAS");
        assert!(poly.is_inside(38.5, -98.0));

        let mut short = tempfile::NamedTempFile::new().unwrap();
        writeln!(short, "X 1 1 2 2").unwrap();
        assert!(parse_xy_poly_file(short.path()).is_err());
        assert!(matches!(
            parse_xy_poly_file("/nonexistent/poly.txt"),
            Err(ProcessorError::Io(_))
        ));
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect((0.0, 0.0), (2.0, 2.0), (0.0, 2.0), (2.0, 0.0)));
        assert!(!segments_intersect((0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)));
        assert!(segments_intersect((0.0, 0.0), (2.0, 0.0), (1.0, 0.0), (3.0, 0.0)));
        assert!(!segments_intersect((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)));
    }

    #[test]
    fn test_min_dist_to_segment() {
        let (p, q) = ((0.0, 0.0), (10.0, 0.0));
        assert_approx_eq!(min_dist_to_segment(p, q, (5.0, 3.0)), 3.0, 1e-12);
        assert_approx_eq!(min_dist_to_segment(p, q, (-3.0, 4.0)), 5.0, 1e-12);
        assert_approx_eq!(min_dist_to_segment(p, q, (13.0, 4.0)), 5.0, 1e-12);
        assert_approx_eq!(min_dist_to_segment(p, p, (3.0, 4.0)), 5.0, 1e-12);
    }

    #[test]
    fn test_polygon_distance() {
        let a = square();
        let mut b = square();
        b.translate(13.0, 0.0);
        assert_approx_eq!(polygon_distance(&a, &b), 3.0, 1e-12);
        b.translate(-5.0, 0.0);
        assert_eq!(polygon_distance(&a, &b), 0.0);

        let small = Polygon::from_points("in", [(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)]);
        assert_eq!(polygon_distance(&a, &small), 0.0);
    }
}
