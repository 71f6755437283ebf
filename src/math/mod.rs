/// Scalar type for every coordinate and extent on the layout grid.
pub type Coord = i64;

/// Integer point on the layout grid.
///
/// Used as a structural map key, so equality and hashing are by value.
pub type GridPoint = nalgebra::Point2<Coord>;

/// Orientation of a divider line.
///
/// A `Vertical` divider runs along the y axis at a fixed x; a `Horizontal`
/// divider runs along the x axis at a fixed y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Picks the coordinate this axis positions a divider on.
    ///
    /// Vertical dividers are positioned by x, horizontal ones by y.
    #[must_use]
    pub fn pick(self, x: Coord, y: Coord) -> Coord {
        match self {
            Self::Vertical => x,
            Self::Horizontal => y,
        }
    }

    /// Picks the coordinate that varies along a divider on this axis.
    #[must_use]
    pub fn along(self, point: &GridPoint) -> Coord {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertical => f.pad("vertical"),
            Self::Horizontal => f.pad("horizontal"),
        }
    }
}
