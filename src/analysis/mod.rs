mod junction;
mod wall;

pub use junction::{ConnectorClass, ConnectorCounts, JunctionReport};
pub use wall::{CutListEntry, Wall};

use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::math::Coord;
use crate::partition::PartitionTree;

/// Connector material thickness used when none is configured, in mm.
pub const DEFAULT_CONNECTOR_THICKNESS: f64 = 3.2;

/// Settings for wall length compensation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    connector_thickness: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            connector_thickness: DEFAULT_CONNECTOR_THICKNESS,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a config with the given connector material thickness.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThickness` if `thickness` is negative,
    /// NaN or infinite.
    pub fn with_connector_thickness(thickness: f64) -> Result<Self, ConfigError> {
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(ConfigError::InvalidThickness(thickness));
        }
        Ok(Self {
            connector_thickness: thickness,
        })
    }

    /// Connector material thickness.
    #[must_use]
    pub fn connector_thickness(&self) -> f64 {
        self.connector_thickness
    }

    /// Length removed from a wall end meeting a connector of `class`.
    #[must_use]
    pub fn compensation(&self, class: ConnectorClass) -> f64 {
        match class {
            ConnectorClass::None => 0.0,
            ConnectorClass::L | ConnectorClass::T | ConnectorClass::X => {
                self.connector_thickness / 2.0
            }
        }
    }
}

/// Derives junction hardware and wall panels from a partition tree.
///
/// Holds no state between calls: every method recomputes from the tree's
/// current dividers.
#[derive(Debug, Clone, Copy)]
pub struct WallAnalyzer<'a> {
    tree: &'a PartitionTree,
    config: AnalyzerConfig,
}

impl<'a> WallAnalyzer<'a> {
    /// Creates an analyzer over `tree`.
    #[must_use]
    pub fn new(tree: &'a PartitionTree, config: AnalyzerConfig) -> Self {
        Self { tree, config }
    }

    /// Classifies every junction of the current divider geometry.
    #[must_use]
    pub fn classify_junctions(&self) -> JunctionReport {
        let report = junction::classify(self.tree);
        let counts = report.counts();
        debug!(l = counts.l, t = counts.t, x = counts.x, "classified junctions");
        report
    }

    /// Walls in divider order, each split at the junctions on its line.
    #[must_use]
    pub fn generate_walls(&self) -> Vec<Wall> {
        let report = self.classify_junctions();
        let walls = wall::walls_for(&self.tree.all_dividers(), &report, &self.config);
        debug!(walls = walls.len(), "generated walls");
        walls
    }

    /// Walls grouped by cut length, longest first.
    #[must_use]
    pub fn cut_list(&self) -> Vec<CutListEntry> {
        wall::cut_list(&self.generate_walls())
    }

    /// Compartment count, cut list and connector counts in one value.
    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            width: self.tree.width(),
            height: self.tree.height(),
            compartments: self.tree.all_leaves().len(),
            cut_list: self.cut_list(),
            connectors: self.classify_junctions().counts(),
        }
    }
}

/// Bill of materials for one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub width: Coord,
    pub height: Coord,
    pub compartments: usize,
    pub cut_list: Vec<CutListEntry>,
    pub connectors: ConnectorCounts,
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dividers for a {} by {} space", self.width, self.height)?;
        writeln!(f, "Total compartments: {}", self.compartments)?;
        writeln!(f, "Walls needed:")?;
        for entry in &self.cut_list {
            writeln!(f, "  {} walls of length {}", entry.count, entry.length)?;
        }
        writeln!(f, "Connectors needed:")?;
        for class in [ConnectorClass::L, ConnectorClass::T, ConnectorClass::X] {
            writeln!(f, "  {class}: {}", self.connectors.get(class))?;
        }
        Ok(())
    }
}
