use std::collections::{HashMap, HashSet};

use crate::error::IndexError;
use crate::math::{Coord, GridPoint};

/// Two-layer coordinate index over grid points.
///
/// Every point is stored twice: once under its x (bucketed by y) and once
/// under its y (bucketed by x). A query along an axis-aligned segment only
/// touches the single bucket for the segment's fixed coordinate.
#[derive(Debug, Default, Clone)]
pub struct SpatialPointIndex {
    by_x: HashMap<Coord, HashSet<Coord>>,
    by_y: HashMap<Coord, HashSet<Coord>>,
}

impl SpatialPointIndex {
    /// Creates a new, empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a point. Re-inserting an indexed point has no effect.
    pub fn add_point(&mut self, point: GridPoint) {
        self.by_x.entry(point.x).or_default().insert(point.y);
        self.by_y.entry(point.y).or_default().insert(point.x);
    }

    /// Removes a point, dropping buckets that become empty.
    /// Removing a point that is not indexed has no effect.
    pub fn remove_point(&mut self, x: Coord, y: Coord) {
        remove_from(&mut self.by_x, x, y);
        remove_from(&mut self.by_y, y, x);
    }

    /// Returns `true` if the point is indexed.
    #[must_use]
    pub fn contains(&self, point: &GridPoint) -> bool {
        self.by_x
            .get(&point.x)
            .is_some_and(|ys| ys.contains(&point.y))
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_x.values().map(HashSet::len).sum()
    }

    /// Returns `true` if no point is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_x.is_empty()
    }

    /// Points with the given `y` whose x lies in the inclusive range spanned
    /// by `x1` and `x2`. The result is unordered.
    #[must_use]
    pub fn find_points_on_horizontal_segment(&self, y: Coord, x1: Coord, x2: Coord) -> Vec<GridPoint> {
        let (lo, hi) = ordered(x1, x2);
        self.by_y.get(&y).map_or_else(Vec::new, |xs| {
            xs.iter()
                .filter(|&&x| lo <= x && x <= hi)
                .map(|&x| GridPoint::new(x, y))
                .collect()
        })
    }

    /// Points with the given `x` whose y lies in the inclusive range spanned
    /// by `y1` and `y2`. The result is unordered.
    #[must_use]
    pub fn find_points_on_vertical_segment(&self, x: Coord, y1: Coord, y2: Coord) -> Vec<GridPoint> {
        let (lo, hi) = ordered(y1, y2);
        self.by_x.get(&x).map_or_else(Vec::new, |ys| {
            ys.iter()
                .filter(|&&y| lo <= y && y <= hi)
                .map(|&y| GridPoint::new(x, y))
                .collect()
        })
    }

    /// Points on the segment `(x1, y1) -> (x2, y2)`.
    ///
    /// A degenerate segment (both ends equal) is treated as horizontal.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidSegment` if the segment is neither
    /// horizontal nor vertical.
    pub fn find_points_on_segment(
        &self,
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
    ) -> Result<Vec<GridPoint>, IndexError> {
        if y1 == y2 {
            Ok(self.find_points_on_horizontal_segment(y1, x1, x2))
        } else if x1 == x2 {
            Ok(self.find_points_on_vertical_segment(x1, y1, y2))
        } else {
            Err(IndexError::InvalidSegment {
                start: GridPoint::new(x1, y1),
                end: GridPoint::new(x2, y2),
            })
        }
    }
}

fn ordered(a: Coord, b: Coord) -> (Coord, Coord) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn remove_from(map: &mut HashMap<Coord, HashSet<Coord>>, outer: Coord, inner: Coord) {
    if let Some(bucket) = map.get_mut(&outer) {
        bucket.remove(&inner);
        if bucket.is_empty() {
            map.remove(&outer);
        }
    }
}
