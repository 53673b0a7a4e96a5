//! Greedy lane packing for the work orders of one row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::interval::overlaps;
use crate::model::{Interval, WorkOrder};

/// Anything with a stable id and an inclusive-day interval.
pub trait Scheduled {
    fn schedule_id(&self) -> &str;
    fn interval(&self) -> Interval;
}

impl Scheduled for WorkOrder {
    fn schedule_id(&self) -> &str {
        &self.id
    }

    fn interval(&self) -> Interval {
        self.interval
    }
}

impl<'a> Scheduled for (&'a str, Interval) {
    fn schedule_id(&self) -> &str {
        self.0
    }

    fn interval(&self) -> Interval {
        self.1
    }
}

/// Lane index per id for one row, plus the number of lanes the row needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    lanes: BTreeMap<String, usize>,
    lane_count: usize,
}

impl Default for LaneAssignment {
    fn default() -> Self {
        Self {
            lanes: BTreeMap::new(),
            lane_count: 1,
        }
    }
}

impl LaneAssignment {
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.lanes.get(id).copied()
    }

    /// At least 1: an empty row still reserves one lane of height.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lanes.iter().map(|(id, lane)| (id.as_str(), *lane))
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Pack intervals into the fewest lanes such that no lane holds two
/// overlapping intervals.
///
/// Items are visited by `(start, id)`, so the result does not depend on input
/// order. Each lane only remembers the interval placed last: in start order
/// that one also ends last, so it alone decides whether the next item fits.
pub fn assign_lanes<'a, T, I>(items: I) -> LaneAssignment
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = items.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.interval()
            .start
            .cmp(&b.interval().start)
            .then_with(|| a.schedule_id().cmp(b.schedule_id()))
    });

    let mut lane_tails: Vec<Interval> = Vec::new();
    let mut lanes = BTreeMap::new();
    for item in sorted {
        let interval = item.interval();
        let lane = match lane_tails.iter().position(|tail| !overlaps(tail, &interval)) {
            Some(free) => {
                lane_tails[free] = interval;
                free
            }
            None => {
                lane_tails.push(interval);
                lane_tails.len() - 1
            }
        };
        lanes.insert(item.schedule_id().to_string(), lane);
    }

    LaneAssignment {
        lanes,
        lane_count: lane_tails.len().max(1),
    }
}

/// Group orders by work center and pack each row independently.
pub fn assign_lanes_by_row(orders: &[WorkOrder]) -> BTreeMap<String, LaneAssignment> {
    let mut rows: BTreeMap<&str, Vec<&WorkOrder>> = BTreeMap::new();
    for order in orders {
        rows.entry(order.work_center_id.as_str()).or_default().push(order);
    }
    rows.into_iter()
        .map(|(row, members)| (row.to_string(), assign_lanes(members)))
        .collect()
}

/// Vertical metrics for rows. Row height grows with the lane count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    pub min_row_height: f32,
    pub lane_height: f32,
    pub row_padding: f32,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            min_row_height: 64.0,
            lane_height: 44.0,
            row_padding: 20.0,
        }
    }
}

impl RowLayout {
    pub fn row_height(&self, lane_count: usize) -> f32 {
        (lane_count as f32 * self.lane_height + self.row_padding).max(self.min_row_height)
    }

    /// Top offset of a lane inside its row.
    pub fn lane_offset(&self, lane: usize) -> f32 {
        self.row_padding / 2.0 + lane as f32 * self.lane_height
    }
}
