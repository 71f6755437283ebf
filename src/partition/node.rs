use std::fmt;

use crate::geometry::Rectangle;
use crate::math::{Axis, Coord, GridPoint};

slotmap::new_key_type! {
    /// Handle to a node in a partition tree's arena.
    pub struct NodeId;
}

/// Split record of an internal node: the divider line and both children.
///
/// Holding the children and the divider in one value means a node can
/// never carry one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub axis: Axis,
    pub position: Coord,
    /// Child on the low side (left for vertical, top for horizontal).
    pub left: NodeId,
    /// Child on the high side (right for vertical, bottom for horizontal).
    pub right: NodeId,
}

/// A node of the partition tree.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    pub(crate) rectangle: Rectangle,
    /// Navigational only; the arena owns every node.
    pub(crate) parent: Option<NodeId>,
    pub(crate) split: Option<Split>,
}

impl PartitionNode {
    pub(crate) fn leaf(rectangle: Rectangle, parent: Option<NodeId>) -> Self {
        Self {
            rectangle,
            parent,
            split: None,
        }
    }

    /// Full extent of this node.
    #[must_use]
    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    /// Parent handle, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns `true` if this node has no divider and no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    /// Split record, `None` for leaves.
    #[must_use]
    pub fn split(&self) -> Option<&Split> {
        self.split.as_ref()
    }

    /// `(left, right)` children, `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.split.map(|s| (s.left, s.right))
    }

    /// The divider owned by this node, `None` for leaves.
    #[must_use]
    pub fn divider(&self) -> Option<Divider> {
        self.split.map(|s| Divider {
            axis: s.axis,
            position: s.position,
            parent: self.rectangle,
        })
    }
}

impl fmt::Display for PartitionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.split {
            None => write!(f, "Leaf({})", self.rectangle),
            Some(s) => write!(
                f,
                "Node({}, divider={} at {})",
                self.rectangle, s.axis, s.position
            ),
        }
    }
}

/// A divider line as seen by renderers and the wall analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divider {
    pub axis: Axis,
    pub position: Coord,
    /// Extent of the node that owns the divider.
    pub parent: Rectangle,
}

impl Divider {
    /// The two ends of the divider, spanning the full parent extent along
    /// the cross axis. The first endpoint has the lower varying coordinate.
    #[must_use]
    pub fn endpoints(&self) -> (GridPoint, GridPoint) {
        let r = &self.parent;
        match self.axis {
            Axis::Vertical => (
                GridPoint::new(self.position, r.y),
                GridPoint::new(self.position, r.bottom()),
            ),
            Axis::Horizontal => (
                GridPoint::new(r.x, self.position),
                GridPoint::new(r.right(), self.position),
            ),
        }
    }
}

impl fmt::Display for Divider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Axis::Vertical => write!(f, "Vertical divider at x={} within {}", self.position, self.parent),
            Axis::Horizontal => write!(f, "Horizontal divider at y={} within {}", self.position, self.parent),
        }
    }
}
