//! Timeline layout engine: interval math, lane packing and conflict detection.

mod conflict;
mod interval;
mod lanes;

pub use conflict::{find_conflicts, has_conflict};
pub use interval::{duration_days, overlaps};
pub use lanes::{assign_lanes, assign_lanes_by_row, LaneAssignment, RowLayout, Scheduled};
