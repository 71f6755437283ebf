mod node;
mod tree;

pub use node::{Divider, NodeId, PartitionNode, Split};
pub use tree::PartitionTree;
