//! Grid planning
//!
//! Decomposes a bounding box into an ordered grid of sample points at
//! tile-span resolution. The grid is the canonical ordering for the whole
//! capture run: tiles are fetched per point and composited back in the same
//! row-major sequence, so planning must be deterministic.

use crate::geo::{BoundingBox, GeoPoint, GeoSpan};

/// Position of a sample point within its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    /// Row (latitude direction), 0 at the start corner
    pub row: u32,
    /// Column (longitude direction), 0 at the start corner
    pub col: u32,
}

impl std::fmt::Display for GridIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Row-major ordered decomposition of a bounding box.
///
/// Invariant: `rows * cols == points.len()`, with point `i` at grid
/// position `(i / cols, i % cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    points: Vec<GeoPoint>,
    rows: u32,
    cols: u32,
}

impl Grid {
    /// Number of grid rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of sample points (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the grid holds no points. Never the case for a
    /// planned grid, which has at least one point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample points in row-major order.
    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Grid position of the point at sequence index `i`.
    #[inline]
    pub fn index_of(&self, i: usize) -> GridIndex {
        GridIndex {
            row: (i / self.cols as usize) as u32,
            col: (i % self.cols as usize) as u32,
        }
    }

    /// Iterates sample points with their grid positions, row-major.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            current: 0,
        }
    }
}

/// Iterator over grid sample points in row-major order.
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    grid: &'a Grid,
    current: usize,
}

impl<'a> Iterator for GridIter<'a> {
    type Item = (GridIndex, GeoPoint);

    fn next(&mut self) -> Option<Self::Item> {
        let point = *self.grid.points.get(self.current)?;
        let index = self.grid.index_of(self.current);
        self.current += 1;
        Some((index, point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}

/// Plans the sample grid covering a bounding box at tile-span resolution.
///
/// Column count is `ceil(lng_width / span.lng)` and rows analogously for
/// latitude, minimum 1 each; a box smaller than one tile span (including a
/// zero-extent box) yields a 1×1 grid holding the start corner. Points step
/// from the start corner toward the end corner in fixed span increments,
/// outer loop over latitude rows, inner loop over longitude columns.
///
/// Stepping is integer microdegree arithmetic, so identical inputs always
/// produce an identical point sequence.
pub fn plan_grid(bbox: &BoundingBox, span: GeoSpan) -> Grid {
    let rows = ceil_div(bbox.lat_width_micro(), span.lat_micro()).max(1);
    let cols = ceil_div(bbox.lng_width_micro(), span.lng_micro()).max(1);

    let lat_step = span.lat_micro() * axis_direction(bbox.start().lat_micro(), bbox.end().lat_micro());
    let lng_step = span.lng_micro() * axis_direction(bbox.start().lng_micro(), bbox.end().lng_micro());

    let mut points = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        let lat = bbox.start().lat_micro() + row * lat_step;
        for col in 0..cols {
            let lng = bbox.start().lng_micro() + col * lng_step;
            points.push(GeoPoint::from_micro(lat, lng));
        }
    }

    Grid {
        points,
        rows: rows as u32,
        cols: cols as u32,
    }
}

#[inline]
fn ceil_div(width: i64, span: i64) -> i64 {
    (width + span - 1) / span
}

/// Stepping direction for one axis: toward the end corner, +1 when the
/// corners coincide.
#[inline]
fn axis_direction(start: i64, end: i64) -> i64 {
    if end < start {
        -1
    } else {
        1
    }
}
