use std::fmt;

use slotmap::SlotMap;
use tracing::debug;

use super::node::{Divider, NodeId, PartitionNode, Split};
use crate::error::PartitionError;
use crate::geometry::{CompartmentId, Rectangle};
use crate::math::{Axis, Coord};

/// Binary space partition of a `width` x `height` canvas into rectangular
/// compartments.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Every
/// internal node's children exactly tile its rectangle, and the leaves
/// together tile the canvas.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    nodes: SlotMap<NodeId, PartitionNode>,
    root: NodeId,
    width: Coord,
    height: Coord,
    next_id: u64,
    /// Internal nodes in the order they were split.
    history: Vec<NodeId>,
}

#[allow(clippy::len_without_is_empty)]
impl PartitionTree {
    /// Creates a tree holding a single root compartment covering the canvas.
    ///
    /// Non-positive extents are accepted; such a canvas has no interior, so
    /// every split is rejected with `InvalidPosition`.
    #[must_use]
    pub fn new(width: Coord, height: Coord) -> Self {
        if width <= 0 || height <= 0 {
            debug!(width, height, "partition tree built over an empty canvas");
        }
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(PartitionNode::leaf(
            Rectangle::new(0, 0, width, height, CompartmentId::ROOT),
            None,
        ));
        Self {
            nodes,
            root,
            width,
            height,
            next_id: CompartmentId::ROOT.get() + 1,
            history: Vec::new(),
        }
    }

    /// Discards every split and recreates the root compartment with id 1.
    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
        debug!(width = self.width, height = self.height, "partition tree reset");
    }

    /// Canvas width.
    #[must_use]
    pub fn width(&self) -> Coord {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub fn height(&self) -> Coord {
        self.height
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, internal and leaf.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of splits that `undo` can still reverse.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns a reference to the node, or an error if the handle is stale.
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::NodeNotFound` if the node was discarded.
    pub fn node(&self, id: NodeId) -> Result<&PartitionNode, PartitionError> {
        self.nodes.get(id).ok_or(PartitionError::NodeNotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut PartitionNode, PartitionError> {
        self.nodes.get_mut(id).ok_or(PartitionError::NodeNotFound)
    }

    fn allocate_id(&mut self) -> CompartmentId {
        let id = CompartmentId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // --- Mutation ---

    /// Splits a leaf with a divider at absolute `position` along `axis`.
    ///
    /// On success the node becomes internal and the two new leaves are
    /// returned as `(low side, high side)`.
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::NotALeaf` if the node already has children,
    /// or `PartitionError::InvalidPosition` if `position` is not strictly
    /// inside the node's rectangle along `axis`.
    pub fn split(
        &mut self,
        node: NodeId,
        axis: Axis,
        position: Coord,
    ) -> Result<(NodeId, NodeId), PartitionError> {
        let target = self.node(node)?;
        if !target.is_leaf() {
            debug!(id = %target.rectangle.id, "rejected split of non-leaf node");
            return Err(PartitionError::NotALeaf);
        }

        let rect = target.rectangle;
        let (min, max) = rect.span(axis);
        if position <= min || position >= max {
            debug!(id = %rect.id, %axis, position, min, max, "rejected split outside compartment");
            return Err(PartitionError::InvalidPosition {
                axis,
                position,
                min,
                max,
            });
        }

        let low_id = self.allocate_id();
        let high_id = self.allocate_id();
        let (low, high) = rect.split_bounds(axis, position, low_id, high_id);
        let left = self.nodes.insert(PartitionNode::leaf(low, Some(node)));
        let right = self.nodes.insert(PartitionNode::leaf(high, Some(node)));

        self.node_mut(node)?.split = Some(Split {
            axis,
            position,
            left,
            right,
        });
        self.history.push(node);

        debug!(id = %rect.id, %axis, position, left = %low_id, right = %high_id, "split compartment");
        Ok((left, right))
    }

    /// Splits a leaf at `offset` from its own origin along `axis`.
    ///
    /// # Errors
    ///
    /// Same as [`PartitionTree::split`].
    pub fn split_at_offset(
        &mut self,
        node: NodeId,
        axis: Axis,
        offset: Coord,
    ) -> Result<(NodeId, NodeId), PartitionError> {
        let (min, max) = self.node(node)?.rectangle.span(axis);
        let Some(position) = min.checked_add(offset) else {
            debug!(%axis, offset, "rejected split offset past the coordinate range");
            return Err(PartitionError::InvalidPosition {
                axis,
                position: offset,
                min,
                max,
            });
        };
        self.split(node, axis, position)
    }

    /// Removes the divider of `node`, turning it back into a leaf with a
    /// fresh id.
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::IsLeaf` if the node has no children, or
    /// `PartitionError::ChildrenNotBothLeaves` if either child is itself
    /// split.
    pub fn merge_children(&mut self, node: NodeId) -> Result<NodeId, PartitionError> {
        let target = self.node(node)?;
        let Some(split) = target.split else {
            debug!(id = %target.rectangle.id, "rejected merge of leaf node");
            return Err(PartitionError::IsLeaf);
        };
        if !(self.node(split.left)?.is_leaf() && self.node(split.right)?.is_leaf()) {
            debug!(id = %target.rectangle.id, "rejected merge through a split child");
            return Err(PartitionError::ChildrenNotBothLeaves);
        }

        self.nodes.remove(split.left);
        self.nodes.remove(split.right);
        let id = self.allocate_id();
        let target = self.node_mut(node)?;
        let old_id = target.rectangle.id;
        target.split = None;
        target.rectangle.id = id;
        self.history.retain(|&entry| entry != node);

        debug!(old = %old_id, new = %id, "merged compartment");
        Ok(node)
    }

    /// Reverses the most recent split that is still in the tree.
    ///
    /// # Errors
    ///
    /// Returns `PartitionError::EmptyHistory` if there is nothing to undo.
    /// If the merge itself fails its error is returned and the history is
    /// left unchanged.
    pub fn undo(&mut self) -> Result<NodeId, PartitionError> {
        let Some(&node) = self.history.last() else {
            debug!("nothing to undo");
            return Err(PartitionError::EmptyHistory);
        };
        self.merge_children(node)
    }

    // --- Lookup ---

    /// Finds the node whose rectangle carries `id`, searching depth-first.
    #[must_use]
    pub fn find_by_id(&self, id: CompartmentId) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let node = self.nodes.get(current)?;
            if node.rectangle.id == id {
                return Some(current);
            }
            if let Some(split) = node.split {
                stack.push(split.right);
                stack.push(split.left);
            }
        }
        None
    }

    /// Finds the leaf containing `(x, y)`.
    ///
    /// A point exactly on a divider belongs to the right/bottom child.
    /// Returns `None` outside the canvas, including on its right and bottom
    /// edges.
    #[must_use]
    pub fn find_by_position(&self, x: Coord, y: Coord) -> Option<NodeId> {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current)?;
            if !node.rectangle.contains_point(x, y) {
                return None;
            }
            match node.split {
                None => return Some(current),
                Some(split) => {
                    current = if split.axis.pick(x, y) < split.position {
                        split.left
                    } else {
                        split.right
                    };
                }
            }
        }
    }

    // --- Traversal ---

    /// Visits node, then left subtree, then right subtree.
    pub fn traverse_preorder<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &PartitionNode, usize),
    {
        self.preorder_from(self.root, 0, &mut visitor);
    }

    fn preorder_from<F>(&self, id: NodeId, depth: usize, visitor: &mut F)
    where
        F: FnMut(NodeId, &PartitionNode, usize),
    {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        visitor(id, node, depth);
        if let Some(split) = node.split {
            self.preorder_from(split.left, depth + 1, visitor);
            self.preorder_from(split.right, depth + 1, visitor);
        }
    }

    /// Visits left subtree, then node, then right subtree.
    ///
    /// This yields compartments left-to-right and top-to-bottom.
    pub fn traverse_inorder<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &PartitionNode, usize),
    {
        self.inorder_from(self.root, 0, &mut visitor);
    }

    fn inorder_from<F>(&self, id: NodeId, depth: usize, visitor: &mut F)
    where
        F: FnMut(NodeId, &PartitionNode, usize),
    {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(split) = node.split {
            self.inorder_from(split.left, depth + 1, visitor);
        }
        visitor(id, node, depth);
        if let Some(split) = node.split {
            self.inorder_from(split.right, depth + 1, visitor);
        }
    }

    /// Leaf handles in inorder.
    #[must_use]
    pub fn all_leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.traverse_inorder(|id, node, _| {
            if node.is_leaf() {
                leaves.push(id);
            }
        });
        leaves
    }

    /// Leaf rectangles in inorder.
    #[must_use]
    pub fn compartments(&self) -> Vec<Rectangle> {
        let mut rects = Vec::new();
        self.traverse_inorder(|_, node, _| {
            if node.is_leaf() {
                rects.push(node.rectangle);
            }
        });
        rects
    }

    /// Dividers of all internal nodes in inorder.
    #[must_use]
    pub fn all_dividers(&self) -> Vec<Divider> {
        let mut dividers = Vec::new();
        self.traverse_inorder(|_, node, _| {
            if let Some(divider) = node.divider() {
                dividers.push(divider);
            }
        });
        dividers
    }
}

impl fmt::Display for PartitionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compartments = self.compartments();
        let dividers = self.all_dividers();
        writeln!(f, "Partition tree for {}x{} canvas", self.width, self.height)?;
        writeln!(f, "Total compartments: {}", compartments.len())?;
        writeln!(f, "Total dividers: {}", dividers.len())?;

        writeln!(f, "Tree structure:")?;
        let mut result = Ok(());
        self.traverse_preorder(|_, node, depth| {
            if result.is_ok() {
                result = writeln!(f, "{:indent$}{node}", "", indent = depth * 2);
            }
        });
        result?;

        writeln!(f, "Compartments:")?;
        for rect in &compartments {
            writeln!(f, "  {rect}")?;
        }
        writeln!(f, "Dividers:")?;
        for divider in &dividers {
            writeln!(f, "  {divider}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect_of(tree: &PartitionTree, id: NodeId) -> Rectangle {
        *tree.node(id).unwrap().rectangle()
    }

    #[test]
    fn new_tree_has_root_leaf() {
        let tree = PartitionTree::new(400, 300);
        let root = tree.node(tree.root()).unwrap();
        assert!(root.is_leaf());
        assert!(root.parent().is_none());
        assert_eq!(
            *root.rectangle(),
            Rectangle::new(0, 0, 400, 300, CompartmentId::ROOT)
        );
        assert_eq!(tree.all_leaves(), vec![tree.root()]);
        assert!(tree.all_dividers().is_empty());
    }

    #[test]
    fn split_creates_tiling_children_with_fresh_ids() {
        let mut tree = PartitionTree::new(400, 300);
        let root = tree.root();
        let (left, right) = tree.split(root, Axis::Vertical, 150).unwrap();

        let l = rect_of(&tree, left);
        let r = rect_of(&tree, right);
        assert_eq!((l.x, l.y, l.width, l.height), (0, 0, 150, 300));
        assert_eq!((r.x, r.y, r.width, r.height), (150, 0, 250, 300));
        assert_eq!(l.id, CompartmentId::new(2));
        assert_eq!(r.id, CompartmentId::new(3));

        let node = tree.node(root).unwrap();
        assert!(!node.is_leaf());
        assert_eq!(node.children(), Some((left, right)));
        assert_eq!(tree.node(left).unwrap().parent(), Some(root));
        assert_eq!(tree.history_len(), 1);
    }

    #[test]
    fn split_rejects_boundary_positions() {
        let mut tree = PartitionTree::new(100, 50);
        let root = tree.root();
        for position in [-5, 0, 100, 120] {
            let err = tree.split(root, Axis::Vertical, position).unwrap_err();
            assert!(matches!(err, PartitionError::InvalidPosition { .. }));
        }
        assert_eq!(
            tree.split(root, Axis::Horizontal, 50).unwrap_err(),
            PartitionError::InvalidPosition {
                axis: Axis::Horizontal,
                position: 50,
                min: 0,
                max: 50,
            }
        );
        assert!(tree.node(root).unwrap().is_leaf());
        assert_eq!(tree.history_len(), 0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn split_rejects_internal_node() {
        let mut tree = PartitionTree::new(100, 100);
        let root = tree.root();
        tree.split(root, Axis::Horizontal, 40).unwrap();
        assert_eq!(
            tree.split(root, Axis::Vertical, 20).unwrap_err(),
            PartitionError::NotALeaf
        );
        assert_eq!(tree.history_len(), 1);
    }

    #[test]
    fn split_at_offset_is_relative_to_origin() {
        let mut tree = PartitionTree::new(100, 100);
        let (_, bottom) = tree.split(tree.root(), Axis::Horizontal, 40).unwrap();
        let (upper, lower) = tree.split_at_offset(bottom, Axis::Horizontal, 10).unwrap();
        assert_eq!(rect_of(&tree, upper).height, 10);
        assert_eq!(rect_of(&tree, lower).y, 50);

        let err = tree.split_at_offset(upper, Axis::Horizontal, 10).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidPosition { position: 50, .. }));
    }

    #[test]
    fn split_at_offset_rejects_overflowing_offset() {
        let mut tree = PartitionTree::new(400, 400);
        let (_, right) = tree.split(tree.root(), Axis::Vertical, 200).unwrap();

        let err = tree.split_at_offset(right, Axis::Vertical, Coord::MAX).unwrap_err();
        assert_eq!(
            err,
            PartitionError::InvalidPosition {
                axis: Axis::Vertical,
                position: Coord::MAX,
                min: 200,
                max: 400,
            }
        );
        let err = tree.split_at_offset(right, Axis::Horizontal, Coord::MIN).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidPosition { .. }));
        assert!(tree.node(right).unwrap().is_leaf());
        assert_eq!(tree.history_len(), 1);
    }

    #[test]
    fn empty_canvas_rejects_every_split() {
        let mut tree = PartitionTree::new(0, -10);
        for (axis, position) in [(Axis::Vertical, 0), (Axis::Horizontal, -5)] {
            let err = tree.split(tree.root(), axis, position).unwrap_err();
            assert!(matches!(err, PartitionError::InvalidPosition { .. }));
        }
        assert_eq!(tree.find_by_position(0, 0), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn find_by_position_routes_ties_to_high_side() {
        let mut tree = PartitionTree::new(400, 400);
        let (left, right) = tree.split(tree.root(), Axis::Vertical, 200).unwrap();
        assert_eq!(tree.find_by_position(199, 10), Some(left));
        assert_eq!(tree.find_by_position(200, 10), Some(right));
        assert_eq!(tree.find_by_position(201, 399), Some(right));

        let (top, bottom) = tree.split(left, Axis::Horizontal, 100).unwrap();
        assert_eq!(tree.find_by_position(50, 99), Some(top));
        assert_eq!(tree.find_by_position(50, 100), Some(bottom));
    }

    #[test]
    fn find_by_position_outside_canvas() {
        let tree = PartitionTree::new(400, 400);
        assert_eq!(tree.find_by_position(-1, 0), None);
        assert_eq!(tree.find_by_position(400, 10), None);
        assert_eq!(tree.find_by_position(10, 400), None);
        assert_eq!(tree.find_by_position(0, 0), Some(tree.root()));
    }

    #[test]
    fn find_by_id_searches_internal_and_leaf_nodes() {
        let mut tree = PartitionTree::new(400, 400);
        let (left, right) = tree.split(tree.root(), Axis::Vertical, 200).unwrap();
        let (_, deep) = tree.split(right, Axis::Horizontal, 300).unwrap();

        assert_eq!(tree.find_by_id(CompartmentId::ROOT), Some(tree.root()));
        assert_eq!(tree.find_by_id(rect_of(&tree, left).id), Some(left));
        assert_eq!(tree.find_by_id(rect_of(&tree, deep).id), Some(deep));
        assert_eq!(tree.find_by_id(CompartmentId::new(99)), None);
    }

    #[test]
    fn undo_restores_single_leaf_with_new_id() {
        let mut tree = PartitionTree::new(400, 300);
        let root = tree.root();
        tree.split(root, Axis::Vertical, 100).unwrap();

        let merged = tree.undo().unwrap();
        assert_eq!(merged, root);
        let rect = rect_of(&tree, root);
        assert!(rect.same_bounds(&Rectangle::new(0, 0, 400, 300, CompartmentId::ROOT)));
        assert_ne!(rect.id, CompartmentId::ROOT);
        assert_eq!(rect.id, CompartmentId::new(4));
        assert_eq!(tree.all_leaves(), vec![root]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.undo().unwrap_err(), PartitionError::EmptyHistory);
    }

    #[test]
    fn merge_guards() {
        let mut tree = PartitionTree::new(400, 400);
        let root = tree.root();
        assert_eq!(tree.merge_children(root).unwrap_err(), PartitionError::IsLeaf);

        let (left, _) = tree.split(root, Axis::Vertical, 200).unwrap();
        tree.split(left, Axis::Horizontal, 100).unwrap();
        assert_eq!(
            tree.merge_children(root).unwrap_err(),
            PartitionError::ChildrenNotBothLeaves
        );
        assert_eq!(tree.all_leaves().len(), 3);
    }

    #[test]
    fn undo_reverses_latest_surviving_split() {
        let mut tree = PartitionTree::new(400, 400);
        let root = tree.root();
        let (left, right) = tree.split(root, Axis::Vertical, 200).unwrap();
        tree.split(left, Axis::Horizontal, 100).unwrap();
        tree.split(right, Axis::Horizontal, 300).unwrap();

        // Merging `left` directly drops its history entry.
        tree.merge_children(left).unwrap();
        assert_eq!(tree.history_len(), 2);

        assert_eq!(tree.undo().unwrap(), right);
        assert_eq!(tree.undo().unwrap(), root);
        assert_eq!(tree.undo().unwrap_err(), PartitionError::EmptyHistory);
        assert_eq!(tree.all_leaves(), vec![root]);
    }

    #[test]
    fn stale_handles_are_reported() {
        let mut tree = PartitionTree::new(100, 100);
        let (left, _) = tree.split(tree.root(), Axis::Vertical, 50).unwrap();
        tree.undo().unwrap();
        assert_eq!(tree.node(left).unwrap_err(), PartitionError::NodeNotFound);
        assert_eq!(
            tree.split(left, Axis::Horizontal, 10).unwrap_err(),
            PartitionError::NodeNotFound
        );
    }

    #[test]
    fn ids_are_never_reused() {
        let mut tree = PartitionTree::new(100, 100);
        let mut seen = std::collections::HashSet::new();
        seen.insert(CompartmentId::ROOT);
        for _ in 0..3 {
            let (l, r) = tree.split(tree.root(), Axis::Vertical, 50).unwrap();
            assert!(seen.insert(rect_of(&tree, l).id));
            assert!(seen.insert(rect_of(&tree, r).id));
            tree.undo().unwrap();
            assert!(seen.insert(rect_of(&tree, tree.root()).id));
        }
    }

    #[test]
    fn reset_restores_root_and_counter() {
        let mut tree = PartitionTree::new(100, 80);
        let (l, _) = tree.split(tree.root(), Axis::Vertical, 50).unwrap();
        tree.split(l, Axis::Horizontal, 40).unwrap();

        tree.reset();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.history_len(), 0);
        assert_eq!(rect_of(&tree, tree.root()).id, CompartmentId::ROOT);
        let (l, _) = tree.split(tree.root(), Axis::Vertical, 50).unwrap();
        assert_eq!(rect_of(&tree, l).id, CompartmentId::new(2));
    }

    #[test]
    fn inorder_orders_leaves_and_dividers() {
        let mut tree = PartitionTree::new(300, 300);
        let (left, right) = tree.split(tree.root(), Axis::Vertical, 100).unwrap();
        tree.split(left, Axis::Horizontal, 150).unwrap();
        tree.split(right, Axis::Vertical, 200).unwrap();

        let xs: Vec<_> = tree.compartments().iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(xs, vec![(0, 0), (0, 150), (100, 0), (200, 0)]);

        let positions: Vec<_> = tree
            .all_dividers()
            .iter()
            .map(|d| (d.axis, d.position))
            .collect();
        assert_eq!(
            positions,
            vec![
                (Axis::Horizontal, 150),
                (Axis::Vertical, 100),
                (Axis::Vertical, 200),
            ]
        );
    }

    #[test]
    fn preorder_reports_depth() {
        let mut tree = PartitionTree::new(300, 300);
        let (left, _) = tree.split(tree.root(), Axis::Vertical, 100).unwrap();
        tree.split(left, Axis::Horizontal, 150).unwrap();

        let mut depths = Vec::new();
        tree.traverse_preorder(|_, node, depth| depths.push((node.is_leaf(), depth)));
        assert_eq!(
            depths,
            vec![(false, 0), (false, 1), (true, 2), (true, 2), (true, 1)]
        );
    }

    #[test]
    fn display_describes_tree() {
        let mut tree = PartitionTree::new(400, 400);
        tree.split(tree.root(), Axis::Vertical, 200).unwrap();
        let text = tree.to_string();
        eprintln!("{text}");
        assert!(text.contains("Partition tree for 400x400 canvas"));
        assert!(text.contains("Total compartments: 2"));
        assert!(text.contains("  Leaf(Rectangle(id=2, x=0, y=0, width=200, height=400))"));
        assert!(text.contains("Vertical divider at x=200"));
    }
}
