use crate::model::{Interval, WorkOrder};
use crate::store::ScheduleStore;

use super::interval::overlaps;

/// Committed orders on `work_center_id` that overlap `candidate`, skipping
/// `exclude_id` so an order being edited does not collide with itself.
pub fn find_conflicts<'a, S>(
    store: &'a S,
    work_center_id: &str,
    candidate: &Interval,
    exclude_id: Option<&str>,
) -> Vec<&'a WorkOrder>
where
    S: ScheduleStore + ?Sized,
{
    store
        .list_by_row(work_center_id)
        .into_iter()
        .filter(|existing| Some(existing.id.as_str()) != exclude_id)
        .filter(|existing| overlaps(candidate, &existing.interval))
        .collect()
}

/// Whether a write of `candidate` to `work_center_id` must be rejected.
pub fn has_conflict<S>(store: &S, work_center_id: &str, candidate: &Interval, exclude_id: Option<&str>) -> bool
where
    S: ScheduleStore + ?Sized,
{
    store
        .list_by_row(work_center_id)
        .into_iter()
        .any(|existing| Some(existing.id.as_str()) != exclude_id && overlaps(candidate, &existing.interval))
}
