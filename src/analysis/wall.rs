use std::cmp::Ordering;

use super::junction::{ConnectorClass, JunctionReport};
use super::AnalyzerConfig;
use crate::math::{Axis, Coord, GridPoint};
use crate::partition::Divider;

/// One cuttable wall panel between two consecutive junctions on a divider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub axis: Axis,
    /// Distance between the two junction points.
    pub raw_length: Coord,
    /// Length to cut once connector material at both ends is accounted for.
    pub compensated_length: f64,
    pub start: GridPoint,
    pub end: GridPoint,
    pub start_connector: ConnectorClass,
    pub end_connector: ConnectorClass,
}

/// A group of walls sharing one cut length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutListEntry {
    pub length: f64,
    pub count: usize,
}

/// Splits every divider into walls at the junctions lying on it.
pub(crate) fn walls_for(
    dividers: &[Divider],
    report: &JunctionReport,
    config: &AnalyzerConfig,
) -> Vec<Wall> {
    let mut walls = Vec::new();
    for divider in dividers {
        let (start, end) = divider.endpoints();
        let mut points = match divider.axis {
            Axis::Vertical => report
                .index()
                .find_points_on_vertical_segment(divider.position, start.y, end.y),
            Axis::Horizontal => report
                .index()
                .find_points_on_horizontal_segment(divider.position, start.x, end.x),
        };
        points.sort_by_key(|p| divider.axis.along(p));

        for pair in points.windows(2) {
            walls.push(wall_between(divider.axis, pair[0], pair[1], report, config));
        }
    }
    walls
}

#[allow(clippy::cast_precision_loss)]
fn wall_between(
    axis: Axis,
    start: GridPoint,
    end: GridPoint,
    report: &JunctionReport,
    config: &AnalyzerConfig,
) -> Wall {
    let start_connector = report.class_at(&start);
    let end_connector = report.class_at(&end);
    let raw_length = (axis.along(&end) - axis.along(&start)).abs();
    let reduction = config.compensation(start_connector) + config.compensation(end_connector);

    Wall {
        axis,
        raw_length,
        compensated_length: (raw_length as f64 - reduction).max(0.0),
        start,
        end,
        start_connector,
        end_connector,
    }
}

/// Groups walls by compensated length, longest first.
pub(crate) fn cut_list(walls: &[Wall]) -> Vec<CutListEntry> {
    let mut lengths: Vec<f64> = walls.iter().map(|w| w.compensated_length).collect();
    lengths.sort_by(|a, b| b.total_cmp(a));

    let mut entries: Vec<CutListEntry> = Vec::new();
    for length in lengths {
        match entries.last_mut() {
            Some(last) if last.length.total_cmp(&length) == Ordering::Equal => last.count += 1,
            _ => entries.push(CutListEntry { length, count: 1 }),
        }
    }
    entries
}
