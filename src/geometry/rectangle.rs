use std::fmt;

use crate::math::{Axis, Coord};

/// Identity of a rectangle within one partition tree.
///
/// Allocated from a per-tree counter that only ever grows; an id is never
/// handed out twice by the same tree until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompartmentId(u64);

impl CompartmentId {
    /// Id of the root compartment of a freshly built tree.
    pub const ROOT: Self = Self(1);

    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CompartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned box with identity.
///
/// `(x, y)` is the top-left corner; y grows downwards, matching the layout
/// canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub id: CompartmentId,
}

impl Rectangle {
    /// Creates a new rectangle.
    #[must_use]
    pub fn new(x: Coord, y: Coord, width: Coord, height: Coord, id: CompartmentId) -> Self {
        Self {
            x,
            y,
            width,
            height,
            id,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> Coord {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> Coord {
        self.y + self.height
    }

    /// Returns the `(low, high)` bounds along the coordinate `axis` positions
    /// a divider on.
    #[must_use]
    pub fn span(&self, axis: Axis) -> (Coord, Coord) {
        match axis {
            Axis::Vertical => (self.x, self.right()),
            Axis::Horizontal => (self.y, self.bottom()),
        }
    }

    /// Half-open containment test: left/top edges are inside, right/bottom
    /// edges are not.
    #[must_use]
    pub fn contains_point(&self, px: Coord, py: Coord) -> bool {
        self.x <= px && px < self.right() && self.y <= py && py < self.bottom()
    }

    /// Area of the rectangle.
    #[must_use]
    pub fn area(&self) -> Coord {
        self.width * self.height
    }

    /// Area shared with `other`; zero when they only touch along an edge.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> Coord {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0 || h <= 0 {
            0
        } else {
            w * h
        }
    }

    /// Returns `true` when both rectangles cover the same region, ignoring ids.
    #[must_use]
    pub fn same_bounds(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }

    /// Splits the bounds at `position` along `axis` into the low-side and
    /// high-side halves.
    ///
    /// The caller validates `position` and supplies the ids.
    pub(crate) fn split_bounds(
        &self,
        axis: Axis,
        position: Coord,
        low_id: CompartmentId,
        high_id: CompartmentId,
    ) -> (Self, Self) {
        match axis {
            Axis::Vertical => (
                Self::new(self.x, self.y, position - self.x, self.height, low_id),
                Self::new(position, self.y, self.right() - position, self.height, high_id),
            ),
            Axis::Horizontal => (
                Self::new(self.x, self.y, self.width, position - self.y, low_id),
                Self::new(self.x, position, self.width, self.bottom() - position, high_id),
            ),
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle(id={}, x={}, y={}, width={}, height={})",
            self.id, self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: Coord, y: Coord, w: Coord, h: Coord) -> Rectangle {
        Rectangle::new(x, y, w, h, CompartmentId::new(0))
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(10, 20, 30, 40);
        assert!(r.contains_point(10, 20));
        assert!(r.contains_point(39, 59));
        assert!(!r.contains_point(40, 30));
        assert!(!r.contains_point(20, 60));
        assert!(!r.contains_point(9, 30));
    }

    #[test]
    fn vertical_split_tiles_parent() {
        let r = rect(10, 20, 30, 40);
        let (l, h) = r.split_bounds(Axis::Vertical, 25, CompartmentId::new(2), CompartmentId::new(3));
        assert_eq!((l.x, l.y, l.width, l.height), (10, 20, 15, 40));
        assert_eq!((h.x, h.y, h.width, h.height), (25, 20, 15, 40));
        assert_eq!(l.area() + h.area(), r.area());
        assert_eq!(l.intersection_area(&h), 0);
    }

    #[test]
    fn horizontal_split_tiles_parent() {
        let r = rect(0, 0, 100, 50);
        let (l, h) = r.split_bounds(Axis::Horizontal, 10, CompartmentId::new(2), CompartmentId::new(3));
        assert_eq!((l.x, l.y, l.width, l.height), (0, 0, 100, 10));
        assert_eq!((h.x, h.y, h.width, h.height), (0, 10, 100, 40));
    }

    #[test]
    fn intersection_area_of_overlap() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        assert_eq!(a.intersection_area(&b), 25);
        assert_eq!(a.intersection_area(&rect(10, 0, 5, 5)), 0);
    }

    #[test]
    fn display_lists_fields() {
        let r = Rectangle::new(1, 2, 3, 4, CompartmentId::new(7));
        assert_eq!(r.to_string(), "Rectangle(id=7, x=1, y=2, width=3, height=4)");
    }
}
