use thiserror::Error;

use crate::math::{Axis, Coord, GridPoint};

/// Top-level error type for the Bento partitioning kernel.
#[derive(Debug, Error, PartialEq)]
pub enum BentoError {
    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by partition tree mutations.
///
/// Every variant is recoverable: the tree is left untouched when one of
/// these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PartitionError {
    #[error("cannot split a node that already has children")]
    NotALeaf,

    #[error("{axis:?} divider at {position} is not strictly inside ({min}, {max})")]
    InvalidPosition {
        axis: Axis,
        position: Coord,
        min: Coord,
        max: Coord,
    },

    #[error("cannot merge a leaf node")]
    IsLeaf,

    #[error("cannot merge a node whose children are not both leaves")]
    ChildrenNotBothLeaves,

    #[error("no split to undo")]
    EmptyHistory,

    #[error("node handle does not refer to a live node")]
    NodeNotFound,
}

/// Errors raised by spatial point index queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("segment {start} -> {end} is neither horizontal nor vertical")]
    InvalidSegment { start: GridPoint, end: GridPoint },
}

/// Errors raised while building analyzer configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("connector thickness must be finite and non-negative, got {0}")]
    InvalidThickness(f64),
}

/// Convenience type alias for results using [`BentoError`].
pub type Result<T> = std::result::Result<T, BentoError>;
