use std::collections::HashMap;

use uuid::Uuid;

/// A child range in visual columns, `end_column` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneRange {
    pub id: Uuid,
    pub start_column: usize,
    pub end_column: usize,
}

impl LaneRange {
    pub fn new(id: Uuid, start_column: usize, end_column: usize) -> Self {
        Self {
            id,
            start_column,
            end_column: end_column.max(start_column + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanePacking {
    pub lanes: HashMap<Uuid, usize>,
    pub lane_count: usize,
}

impl LanePacking {
    pub fn lane_of(&self, id: Uuid) -> Option<usize> {
        self.lanes.get(&id).copied()
    }
}

/// Stack ranges into as few lanes as possible.
///
/// Ranges are taken in start order (ties keep input order); each goes into the
/// first lane whose last range has already ended, or opens a new lane.
pub fn pack(ranges: &[LaneRange]) -> LanePacking {
    let mut sorted: Vec<LaneRange> = ranges
        .iter()
        .map(|r| LaneRange::new(r.id, r.start_column, r.end_column))
        .collect();
    sorted.sort_by_key(|r| r.start_column);

    let mut watermarks: Vec<usize> = Vec::new();
    let mut lanes = HashMap::with_capacity(sorted.len());

    for range in &sorted {
        let lane = match watermarks.iter().position(|end| *end <= range.start_column) {
            Some(lane) => {
                watermarks[lane] = range.end_column;
                lane
            }
            None => {
                watermarks.push(range.end_column);
                watermarks.len() - 1
            }
        };
        lanes.insert(range.id, lane);
    }

    LanePacking {
        lanes,
        lane_count: watermarks.len(),
    }
}
