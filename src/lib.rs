pub mod analysis;
pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod partition;

pub use analysis::{
    AnalysisSummary, AnalyzerConfig, ConnectorClass, ConnectorCounts, CutListEntry,
    JunctionReport, Wall, WallAnalyzer,
};
pub use error::{BentoError, ConfigError, IndexError, PartitionError, Result};
pub use geometry::{CompartmentId, Rectangle};
pub use index::SpatialPointIndex;
pub use math::{Axis, Coord, GridPoint};
pub use partition::{Divider, NodeId, PartitionNode, PartitionTree, Split};
