//! Demo schedule seeded on first start and by File → New from Sample.

use chrono::{Duration, NaiveDate};

use crate::model::{Interval, Schedule, WorkCenter, WorkOrder, WorkOrderStatus};

const WORK_CENTERS: [(&str, &str); 5] = [
    ("wc-001", "Extrusion Line A"),
    ("wc-002", "CNC Machine 1"),
    ("wc-003", "Assembly Station"),
    ("wc-004", "Quality Control"),
    ("wc-005", "Packaging Line"),
];

// (id, work center, name, status, start offset, end offset) relative to today.
const WORK_ORDERS: [(&str, &str, &str, WorkOrderStatus, i64, i64); 10] = [
    ("wo-001", "wc-001", "Aluminum Profile Batch #1247", WorkOrderStatus::Complete, -10, -5),
    ("wo-002", "wc-001", "Steel Tubing Run #892", WorkOrderStatus::InProgress, -2, 5),
    ("wo-003", "wc-002", "Precision Gear Set #456", WorkOrderStatus::Open, 2, 8),
    ("wo-004", "wc-002", "Motor Housing #789", WorkOrderStatus::Blocked, -7, -1),
    ("wo-005", "wc-003", "Widget Assembly A-100", WorkOrderStatus::Complete, -14, -10),
    ("wo-006", "wc-003", "Component Kit B-200", WorkOrderStatus::InProgress, -3, 2),
    ("wo-007", "wc-003", "Final Assembly C-300", WorkOrderStatus::Open, 4, 12),
    ("wo-008", "wc-004", "QC Inspection Batch #567", WorkOrderStatus::InProgress, -1, 3),
    ("wo-009", "wc-005", "Shipping Prep Order #1001", WorkOrderStatus::Blocked, 0, 4),
    ("wo-010", "wc-005", "Export Package #1002", WorkOrderStatus::Open, 6, 10),
];

/// Five work centers and ten non-overlapping orders placed around `today`.
pub fn sample_schedule(today: NaiveDate) -> Schedule {
    let mut schedule = Schedule::new("Sample Schedule");
    schedule.work_centers = WORK_CENTERS
        .iter()
        .map(|(id, name)| WorkCenter::new(*id, *name))
        .collect();
    schedule.work_orders = WORK_ORDERS
        .iter()
        .map(|(id, wc, name, status, start, end)| WorkOrder {
            id: id.to_string(),
            work_center_id: wc.to_string(),
            name: name.to_string(),
            status: *status,
            interval: Interval {
                start: today + Duration::days(*start),
                end: today + Duration::days(*end),
            },
        })
        .collect();
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::overlaps;

    #[test]
    fn sample_is_conflict_free_and_covers_statuses() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let schedule = sample_schedule(today);
        assert_eq!(schedule.work_centers.len(), 5);
        assert_eq!(schedule.work_orders.len(), 10);

        for status in WorkOrderStatus::all() {
            assert!(schedule.work_orders.iter().any(|wo| wo.status == *status), "{status}");
        }
        for (i, a) in schedule.work_orders.iter().enumerate() {
            assert!(a.interval.start <= a.interval.end);
            assert!(schedule.work_center(&a.work_center_id).is_some());
            for b in &schedule.work_orders[i + 1..] {
                if a.work_center_id == b.work_center_id {
                    assert!(!overlaps(&a.interval, &b.interval), "{} vs {}", a.id, b.id);
                }
            }
        }
    }
}
