//! Neighborhood templates over grid indices.
//!
//! A [`GridTemplate`] is an immutable list of `(dx, dy)` offsets describing a
//! neighborhood shape, plus the four edge subsets used for sliding the window
//! one row or column at a time. A [`TemplateWindow`] anchors the template at
//! a base cell of an `nx` x `ny` grid and yields the cells it covers.
//!
//! ```
//! use grid_processor::template::{GridTemplate, GridTemplateShape};
//!
//! let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
//! assert_eq!(gt.size(), 9);
//!
//! // Clipped at the grid corner
//! let window = gt.window(0, 0, 10, 10);
//! assert_eq!(window.in_grid().count(), 4);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ProcessorError, Result};

/// An offset from the template base, `(dx, dy)`.
pub type GridOffset = (i64, i64);

/// Neighborhood shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GridTemplateShape {
    /// `width` x `width` box.
    Square,
    /// Cells within `(width - 1) / 2` of the center.
    Circle,
}

impl GridTemplateShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "SQUARE",
            Self::Circle => "CIRCLE",
        }
    }
}

impl FromStr for GridTemplateShape {
    type Err = ProcessorError;

    /// Shape names are matched exactly.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SQUARE" => Ok(Self::Square),
            "CIRCLE" => Ok(Self::Circle),
            other => Err(ProcessorError::unsupported_shape(format!(
                "'{}' (expected SQUARE or CIRCLE)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for GridTemplateShape {
    type Error = ProcessorError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GridTemplateShape> for String {
    fn from(shape: GridTemplateShape) -> Self {
        shape.as_str().to_string()
    }
}

impl fmt::Display for GridTemplateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable neighborhood shape with precomputed edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTemplate {
    shape: GridTemplateShape,
    width: usize,
    wrap_lon: bool,
    offsets: Vec<GridOffset>,
    left_edge: Vec<GridOffset>,
    right_edge: Vec<GridOffset>,
    top_edge: Vec<GridOffset>,
    bottom_edge: Vec<GridOffset>,
}

impl GridTemplate {
    /// Build a template of the given shape and width.
    ///
    /// Even widths put the base cell at the lower-left of the geometric
    /// center. With `wrap_lon` set, x positions wrap around the grid, which
    /// is how global grids treat their first and last columns as neighbors.
    pub fn new(shape: GridTemplateShape, width: usize, wrap_lon: bool) -> Result<Self> {
        if width == 0 {
            return Err(ProcessorError::config("template width must be >= 1"));
        }

        let offsets = match shape {
            GridTemplateShape::Square => square_offsets(width),
            GridTemplateShape::Circle => circle_offsets(width)?,
        };

        let mut template = Self {
            shape,
            width,
            wrap_lon,
            offsets,
            left_edge: Vec::new(),
            right_edge: Vec::new(),
            top_edge: Vec::new(),
            bottom_edge: Vec::new(),
        };
        template.set_edge_offsets();
        Ok(template)
    }

    pub fn shape(&self) -> GridTemplateShape {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn wrap_lon(&self) -> bool {
        self.wrap_lon
    }

    /// Number of cells in the unclipped shape.
    pub fn size(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[GridOffset] {
        &self.offsets
    }

    /// Fails when a wrapping template is wider than the `nx` columns it
    /// wraps around, so that one placement would cover a column twice.
    pub fn check_wrap(&self, nx: usize) -> Result<()> {
        if self.wraps_onto_itself(nx) {
            return Err(ProcessorError::config(format!(
                "{} template of width {} cannot wrap around a grid {} columns wide",
                self.shape, self.width, nx
            )));
        }
        Ok(())
    }

    fn wraps_onto_itself(&self, nx: usize) -> bool {
        self.wrap_lon && self.width > nx
    }

    /// Anchor the template at `(base_x, base_y)` on an `nx` x `ny` grid.
    pub fn window(&self, base_x: i64, base_y: i64, nx: usize, ny: usize) -> TemplateWindow<'_> {
        let base_x = if self.wrap_lon && nx > 0 {
            base_x.rem_euclid(nx as i64)
        } else {
            base_x
        };
        TemplateWindow {
            template: self,
            base_x,
            base_y,
            nx,
            ny,
        }
    }

    /// One line per offset: `dx dy distance`.
    pub fn print_offsets(&self) -> String {
        let mut out = String::new();
        for &(dx, dy) in &self.offsets {
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            let _ = writeln!(out, " {:4} {:4}   {:.6}", dx, dy, distance);
        }
        trace!(shape = %self.shape, width = self.width, "template offsets:\n{}", out);
        out
    }

    fn set_edge_offsets(&mut self) {
        let mut min_x_by_y: BTreeMap<i64, i64> = BTreeMap::new();
        let mut max_x_by_y: BTreeMap<i64, i64> = BTreeMap::new();
        let mut min_y_by_x: BTreeMap<i64, i64> = BTreeMap::new();
        let mut max_y_by_x: BTreeMap<i64, i64> = BTreeMap::new();

        for &(x, y) in &self.offsets {
            min_x_by_y.entry(y).and_modify(|v| *v = (*v).min(x)).or_insert(x);
            max_x_by_y.entry(y).and_modify(|v| *v = (*v).max(x)).or_insert(x);
            min_y_by_x.entry(x).and_modify(|v| *v = (*v).min(y)).or_insert(y);
            max_y_by_x.entry(x).and_modify(|v| *v = (*v).max(y)).or_insert(y);
        }

        self.left_edge = min_x_by_y.into_iter().map(|(y, x)| (x, y)).collect();
        self.right_edge = max_x_by_y.into_iter().map(|(y, x)| (x, y)).collect();
        self.top_edge = max_y_by_x.into_iter().collect();
        self.bottom_edge = min_y_by_x.into_iter().collect();
    }
}

impl fmt::Display for GridTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.shape, self.size())
    }
}

/// Offset range covering `width` cells, with even widths extending one
/// further in the positive direction.
fn offset_range(width: usize) -> (i64, i64) {
    let w = width as i64;
    if w % 2 == 1 {
        (-(w - 1) / 2, (w - 1) / 2)
    } else {
        (-(w / 2 - 1), w / 2)
    }
}

fn square_offsets(width: usize) -> Vec<GridOffset> {
    let (lo, hi) = offset_range(width);
    let mut offsets = Vec::with_capacity(width * width);
    for dy in lo..=hi {
        for dx in lo..=hi {
            offsets.push((dx, dy));
        }
    }
    offsets
}

fn circle_offsets(width: usize) -> Result<Vec<GridOffset>> {
    if width == 2 {
        return Err(ProcessorError::unsupported_shape(
            "CIRCLE templates cannot have a width of 2",
        ));
    }

    let radius = (width as f64 - 1.0) / 2.0;
    let center = if width % 2 == 0 { 0.5 } else { 0.0 };
    let (lo, hi) = offset_range(width);

    let mut offsets = Vec::new();
    for dy in lo..=hi {
        for dx in lo..=hi {
            let x = dx as f64 - center;
            let y = dy as f64 - center;
            if (x * x + y * y).sqrt() <= radius {
                offsets.push((dx, dy));
            }
        }
    }
    Ok(offsets)
}

/// A template anchored at a base cell.
///
/// Every iterator method starts a fresh pass over the current base.
#[derive(Debug, Clone, Copy)]
pub struct TemplateWindow<'a> {
    template: &'a GridTemplate,
    base_x: i64,
    base_y: i64,
    nx: usize,
    ny: usize,
}

impl<'a> TemplateWindow<'a> {
    pub fn template(&self) -> &'a GridTemplate {
        self.template
    }

    pub fn base(&self) -> (i64, i64) {
        (self.base_x, self.base_y)
    }

    /// Cells of the neighborhood that fall inside the grid.
    pub fn in_grid(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.clipped(&self.template.offsets)
    }

    /// Every cell of the neighborhood, including positions off the grid.
    pub fn all(&self) -> impl Iterator<Item = (i64, i64)> + 'a {
        let w = *self;
        self.template
            .offsets
            .iter()
            .map(move |&(dx, dy)| (w.wrap_x(w.base_x + dx), w.base_y + dy))
    }

    /// Lowest cell of each column, the cells that leave on `inc_base_y(1)`.
    pub fn bottom_edge(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.clipped(&self.template.bottom_edge)
    }

    /// Highest cell of each column, the cells that enter on `inc_base_y(1)`.
    pub fn top_edge(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.clipped(&self.template.top_edge)
    }

    /// Leftmost cell of each row, the cells that leave on `inc_base_x(1)`.
    pub fn left_edge(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.clipped(&self.template.left_edge)
    }

    /// Rightmost cell of each row, the cells that enter on `inc_base_x(1)`.
    pub fn right_edge(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.clipped(&self.template.right_edge)
    }

    /// Move the base along x. The new base must lie on the grid.
    pub fn inc_base_x(&mut self, inc: i64) -> Result<()> {
        let x = self.wrap_x(self.base_x + inc);
        if x < 0 || x >= self.nx as i64 {
            return Err(ProcessorError::out_of_range(x, self.base_y, self.nx, self.ny));
        }
        self.base_x = x;
        Ok(())
    }

    /// Move the base along y. The new base must lie on the grid.
    pub fn inc_base_y(&mut self, inc: i64) -> Result<()> {
        let y = self.base_y + inc;
        if y < 0 || y >= self.ny as i64 {
            return Err(ProcessorError::out_of_range(self.base_x, y, self.nx, self.ny));
        }
        self.base_y = y;
        Ok(())
    }

    fn wrap_x(&self, x: i64) -> i64 {
        if self.template.wrap_lon && self.nx > 0 {
            x.rem_euclid(self.nx as i64)
        } else {
            x
        }
    }

    fn locate(&self, dx: i64, dy: i64) -> Option<(usize, usize)> {
        let x = self.wrap_x(self.base_x + dx);
        let y = self.base_y + dy;
        if x >= 0 && x < self.nx as i64 && y >= 0 && y < self.ny as i64 {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    /// Offsets placed on the grid. A wrapping template wider than the grid
    /// lands on some cells twice; only the first visit is reported.
    fn clipped(&self, offsets: &'a [GridOffset]) -> impl Iterator<Item = (usize, usize)> + 'a {
        let w = *self;
        let mut seen = w.template.wraps_onto_itself(w.nx).then(HashSet::new);
        offsets
            .iter()
            .filter_map(move |&(dx, dy)| w.locate(dx, dy))
            .filter(move |cell| seen.as_mut().map_or(true, |s| s.insert(*cell)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shape_from_str() {
        assert_eq!("SQUARE".parse::<GridTemplateShape>().unwrap(), GridTemplateShape::Square);
        assert_eq!("CIRCLE".parse::<GridTemplateShape>().unwrap(), GridTemplateShape::Circle);
        assert!(matches!(
            "square".parse::<GridTemplateShape>(),
            Err(ProcessorError::UnsupportedShape(_))
        ));
        assert!("TRIANGLE".parse::<GridTemplateShape>().is_err());
    }

    #[test]
    fn test_square_sizes_and_offsets() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 1, false).unwrap();
        assert_eq!(gt.offsets(), &[(0, 0)]);

        let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
        assert_eq!(gt.size(), 9);
        assert!(gt.offsets().contains(&(-1, -1)));
        assert!(gt.offsets().contains(&(1, 1)));

        // even width extends up and to the right
        let gt = GridTemplate::new(GridTemplateShape::Square, 4, false).unwrap();
        assert_eq!(gt.size(), 16);
        assert!(gt.offsets().contains(&(-1, -1)));
        assert!(gt.offsets().contains(&(2, 2)));
        assert!(!gt.offsets().contains(&(-2, 0)));
    }

    #[test]
    fn test_circle_sizes() {
        let size = |w| GridTemplate::new(GridTemplateShape::Circle, w, false).unwrap().size();
        assert_eq!(size(1), 1);
        assert_eq!(size(3), 5);
        assert_eq!(size(5), 13);
        assert_eq!(size(4), 4);
        assert_eq!(size(6), 16);
    }

    #[test]
    fn test_circle_width_two_rejected() {
        assert!(matches!(
            GridTemplate::new(GridTemplateShape::Circle, 2, false),
            Err(ProcessorError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(
            GridTemplate::new(GridTemplateShape::Square, 0, false),
            Err(ProcessorError::Config(_))
        ));
    }

    #[test]
    fn test_edges_of_square() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
        assert_eq!(gt.bottom_edge, vec![(-1, -1), (0, -1), (1, -1)]);
        assert_eq!(gt.top_edge, vec![(-1, 1), (0, 1), (1, 1)]);
        assert_eq!(gt.left_edge, vec![(-1, -1), (-1, 0), (-1, 1)]);
        assert_eq!(gt.right_edge, vec![(1, -1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_in_grid_clips_and_all_does_not() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
        let window = gt.window(0, 0, 5, 5);
        let cells: HashSet<_> = window.in_grid().collect();
        assert_eq!(cells, HashSet::from([(0, 0), (1, 0), (0, 1), (1, 1)]));
        assert_eq!(window.all().count(), 9);
        assert!(window.all().any(|c| c == (-1, -1)));
    }

    #[test]
    fn test_iterators_restart() {
        let gt = GridTemplate::new(GridTemplateShape::Circle, 5, false).unwrap();
        let window = gt.window(2, 2, 5, 5);
        assert_eq!(window.in_grid().count(), 13);
        assert_eq!(window.in_grid().count(), 13);
    }

    #[test]
    fn test_inc_base_range_errors() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
        let mut window = gt.window(0, 3, 4, 4);
        assert!(matches!(window.inc_base_y(1), Err(ProcessorError::OutOfRange { y: 4, .. })));
        assert_eq!(window.base(), (0, 3));
        assert!(window.inc_base_x(-1).is_err());
        window.inc_base_x(3).unwrap();
        assert_eq!(window.base(), (3, 3));
    }

    #[test]
    fn test_wrap_lon() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 3, true).unwrap();
        let window = gt.window(0, 2, 10, 5);
        let cells: HashSet<_> = window.in_grid().collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&(9, 2)));

        let mut window = gt.window(9, 2, 10, 5);
        window.inc_base_x(1).unwrap();
        assert_eq!(window.base(), (0, 2));
    }

    #[test]
    fn test_wrap_wider_than_grid_never_repeats() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 5, true).unwrap();
        let window = gt.window(1, 1, 3, 3);
        let listed: Vec<_> = window.in_grid().collect();
        let unique: HashSet<_> = listed.iter().copied().collect();
        assert_eq!(listed.len(), 9);
        assert_eq!(unique.len(), 9);

        assert!(matches!(gt.check_wrap(3), Err(ProcessorError::Config(_))));
        assert!(gt.check_wrap(5).is_ok());
        let no_wrap = GridTemplate::new(GridTemplateShape::Square, 5, false).unwrap();
        assert!(no_wrap.check_wrap(3).is_ok());
    }

    #[test]
    fn test_print_offsets() {
        let gt = GridTemplate::new(GridTemplateShape::Square, 3, false).unwrap();
        let text = gt.print_offsets();
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("1.414214"));
    }
}
