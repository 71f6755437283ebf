use std::collections::HashMap;
use std::fmt;

use crate::index::SpatialPointIndex;
use crate::math::GridPoint;
use crate::partition::PartitionTree;

/// Kind of connector hardware needed at a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorClass {
    /// No wall ends here.
    None,
    /// Canvas corner: two wall ends at 90 degrees.
    L,
    /// A divider ending on another wall: three wall ends.
    T,
    /// Two dividers ending on opposite sides of a wall: four wall ends.
    X,
}

impl ConnectorClass {
    /// Class after one more divider ends at this point.
    fn with_divider_end(self) -> Self {
        match self {
            Self::None => Self::T,
            Self::T => Self::X,
            other => other,
        }
    }
}

impl fmt::Display for ConnectorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("-"),
            Self::L => f.write_str("L"),
            Self::T => f.write_str("T"),
            Self::X => f.write_str("X"),
        }
    }
}

/// Number of junctions per connector class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectorCounts {
    pub l: usize,
    pub t: usize,
    pub x: usize,
}

impl ConnectorCounts {
    /// Count for one class; `None` is never counted.
    #[must_use]
    pub fn get(&self, class: ConnectorClass) -> usize {
        match class {
            ConnectorClass::None => 0,
            ConnectorClass::L => self.l,
            ConnectorClass::T => self.t,
            ConnectorClass::X => self.x,
        }
    }

    /// Total number of connectors.
    #[must_use]
    pub fn total(&self) -> usize {
        self.l + self.t + self.x
    }

    fn bump(&mut self, class: ConnectorClass) {
        match class {
            ConnectorClass::None => {}
            ConnectorClass::L => self.l += 1,
            ConnectorClass::T => self.t += 1,
            ConnectorClass::X => self.x += 1,
        }
    }
}

impl fmt::Display for ConnectorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L: {}, T: {}, X: {}", self.l, self.t, self.x)
    }
}

/// Junction classification of one tree snapshot.
#[derive(Debug, Clone)]
pub struct JunctionReport {
    classes: HashMap<GridPoint, ConnectorClass>,
    index: SpatialPointIndex,
    counts: ConnectorCounts,
}

#[allow(clippy::len_without_is_empty)]
impl JunctionReport {
    /// Class of the junction at `point`, `ConnectorClass::None` if no wall
    /// ends there.
    #[must_use]
    pub fn class_at(&self, point: &GridPoint) -> ConnectorClass {
        self.classes
            .get(point)
            .copied()
            .unwrap_or(ConnectorClass::None)
    }

    /// Per-class tallies.
    #[must_use]
    pub fn counts(&self) -> ConnectorCounts {
        self.counts
    }

    /// Index over every junction point.
    #[must_use]
    pub fn index(&self) -> &SpatialPointIndex {
        &self.index
    }

    /// Number of classified junctions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// All junctions ordered top-to-bottom, then left-to-right.
    #[must_use]
    pub fn junctions(&self) -> Vec<(GridPoint, ConnectorClass)> {
        let mut junctions: Vec<_> = self.classes.iter().map(|(p, c)| (*p, *c)).collect();
        junctions.sort_by_key(|(p, _)| (p.y, p.x));
        junctions
    }
}

/// Classifies every junction point of the tree's divider geometry.
///
/// The four canvas corners are always `L`. Each divider end is `T` the
/// first time its point is seen and `X` the second time. Classification is
/// keyed by coordinate only, so it does not depend on tree shape.
pub(crate) fn classify(tree: &PartitionTree) -> JunctionReport {
    let mut classes = HashMap::new();
    let mut index = SpatialPointIndex::new();

    let (w, h) = (tree.width(), tree.height());
    for corner in [
        GridPoint::new(0, 0),
        GridPoint::new(0, h),
        GridPoint::new(w, 0),
        GridPoint::new(w, h),
    ] {
        classes.insert(corner, ConnectorClass::L);
        index.add_point(corner);
    }

    for divider in tree.all_dividers() {
        let (start, end) = divider.endpoints();
        for point in [start, end] {
            let class = classes.entry(point).or_insert(ConnectorClass::None);
            *class = class.with_divider_end();
            index.add_point(point);
        }
    }

    let mut counts = ConnectorCounts::default();
    for class in classes.values() {
        counts.bump(*class);
    }

    JunctionReport {
        classes,
        index,
        counts,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Axis;

    #[test]
    fn empty_tree_has_only_corners() {
        let tree = PartitionTree::new(100, 60);
        let report = classify(&tree);
        assert_eq!(report.counts(), ConnectorCounts { l: 4, t: 0, x: 0 });
        assert_eq!(report.class_at(&GridPoint::new(100, 60)), ConnectorClass::L);
        assert_eq!(report.class_at(&GridPoint::new(50, 0)), ConnectorClass::None);
        assert_eq!(report.index().len(), 4);
        assert!(report.index().contains(&GridPoint::new(0, 60)));
    }

    #[test]
    fn single_divider_makes_two_tees() {
        let mut tree = PartitionTree::new(400, 400);
        tree.split(tree.root(), Axis::Vertical, 200).unwrap();
        let report = classify(&tree);
        assert_eq!(report.counts(), ConnectorCounts { l: 4, t: 2, x: 0 });
        assert_eq!(report.class_at(&GridPoint::new(200, 0)), ConnectorClass::T);
        assert_eq!(report.class_at(&GridPoint::new(200, 400)), ConnectorClass::T);
    }

    #[test]
    fn opposite_dividers_make_a_cross() {
        let mut tree = PartitionTree::new(400, 400);
        let (left, right) = tree.split(tree.root(), Axis::Vertical, 200).unwrap();
        tree.split(left, Axis::Horizontal, 100).unwrap();
        tree.split(right, Axis::Horizontal, 100).unwrap();

        let report = classify(&tree);
        assert_eq!(report.counts(), ConnectorCounts { l: 4, t: 4, x: 1 });
        assert_eq!(report.class_at(&GridPoint::new(200, 100)), ConnectorClass::X);
        assert_eq!(report.class_at(&GridPoint::new(0, 100)), ConnectorClass::T);
        assert_eq!(report.class_at(&GridPoint::new(400, 100)), ConnectorClass::T);
        assert_eq!(report.len(), 9);
    }

    #[test]
    fn classification_ignores_tree_shape() {
        // Same final geometry built in two different split orders.
        let mut a = PartitionTree::new(300, 300);
        let (left, right) = a.split(a.root(), Axis::Vertical, 100).unwrap();
        a.split(left, Axis::Horizontal, 150).unwrap();
        a.split(right, Axis::Horizontal, 150).unwrap();

        let mut b = PartitionTree::new(300, 300);
        let (top, bottom) = b.split(b.root(), Axis::Horizontal, 150).unwrap();
        b.split(top, Axis::Vertical, 100).unwrap();
        b.split(bottom, Axis::Vertical, 100).unwrap();

        assert_eq!(classify(&a).junctions(), classify(&b).junctions());
    }

    #[test]
    fn junctions_are_ordered() {
        let mut tree = PartitionTree::new(10, 10);
        tree.split(tree.root(), Axis::Horizontal, 4).unwrap();
        let points: Vec<_> = classify(&tree)
            .junctions()
            .into_iter()
            .map(|(p, c)| (p.x, p.y, c))
            .collect();
        assert_eq!(
            points,
            vec![
                (0, 0, ConnectorClass::L),
                (10, 0, ConnectorClass::L),
                (0, 4, ConnectorClass::T),
                (10, 4, ConnectorClass::T),
                (0, 10, ConnectorClass::L),
                (10, 10, ConnectorClass::L),
            ]
        );
    }
}
