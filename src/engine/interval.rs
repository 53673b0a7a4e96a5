//! Inclusive-day interval math.
//!
//! [`overlaps`] is the single overlap rule for the crate: lane packing and the
//! write-path conflict check both call it.

use crate::model::Interval;

/// Whether two inclusive-day intervals share at least one calendar day.
///
/// Each end is extended to the end of its day, then the half-open ranges are
/// intersected: `a.start < b.end + 1 day && b.start < a.end + 1 day`.
/// Back-to-back intervals do not overlap; same-day intervals do.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start < b.end_exclusive() && b.start < a.end_exclusive()
}

/// Number of calendar days covered, counting both ends.
pub fn duration_days(interval: &Interval) -> i64 {
    (interval.end - interval.start).num_days() + 1
}
