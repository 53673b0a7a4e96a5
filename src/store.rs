//! Work order storage and the conflict-gated write path.
//!
//! Every create or update goes through [`ScheduleStore::commit`], which
//! validates the draft and rejects any interval overlapping another order on
//! the same work center. A rejected commit leaves the store untouched.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::find_conflicts;
use crate::error::{Conflict, StoreError};
use crate::model::{Interval, Schedule, WorkOrder, WorkOrderDraft};

/// Whether a commit creates a new order or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMode {
    Create,
    Update { id: String },
}

impl CommitMode {
    /// Id the conflict check must skip.
    pub fn exclude_id(&self) -> Option<&str> {
        match self {
            CommitMode::Create => None,
            CommitMode::Update { id } => Some(id.as_str()),
        }
    }
}

/// The persistent collection of work orders.
pub trait ScheduleStore {
    /// Orders on one work center, in insertion order.
    fn list_by_row(&self, work_center_id: &str) -> Vec<&WorkOrder>;

    fn get_by_id(&self, id: &str) -> Option<&WorkOrder>;

    /// Validate and persist a draft. Returns the stored order.
    fn commit(&mut self, draft: WorkOrderDraft, mode: CommitMode) -> Result<WorkOrder, StoreError>;

    /// Remove an order. Returns whether it existed.
    fn delete(&mut self, id: &str) -> bool;
}

/// Fresh work order id, `wo-` followed by a simple uuid.
pub fn new_work_order_id() -> String {
    format!("wo-{}", Uuid::new_v4().simple())
}

impl Schedule {
    fn validate(&self, draft: &mut WorkOrderDraft, mode: &CommitMode) -> Result<(), StoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        draft.name = name.to_string();

        // Fields are public, so re-check the range here.
        draft.interval = Interval::new(draft.interval.start, draft.interval.end)?;

        if self.work_center(&draft.work_center_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "work center",
                id: draft.work_center_id.clone(),
            });
        }

        if let CommitMode::Update { id } = mode {
            if self.get_by_id(id).is_none() {
                return Err(StoreError::NotFound {
                    kind: "work order",
                    id: id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Replace the whole document, e.g. after loading a file.
    pub fn reset_to(&mut self, other: Schedule) {
        info!(
            name = %other.name,
            work_centers = other.work_centers.len(),
            work_orders = other.work_orders.len(),
            "Schedule replaced"
        );
        *self = other;
    }
}

impl ScheduleStore for Schedule {
    fn list_by_row(&self, work_center_id: &str) -> Vec<&WorkOrder> {
        self.work_orders
            .iter()
            .filter(|wo| wo.work_center_id == work_center_id)
            .collect()
    }

    fn get_by_id(&self, id: &str) -> Option<&WorkOrder> {
        self.work_orders.iter().find(|wo| wo.id == id)
    }

    fn commit(&mut self, mut draft: WorkOrderDraft, mode: CommitMode) -> Result<WorkOrder, StoreError> {
        self.validate(&mut draft, &mode)?;

        let conflicting_ids: Vec<String> =
            find_conflicts(&*self, &draft.work_center_id, &draft.interval, mode.exclude_id())
                .into_iter()
                .map(|wo| wo.id.clone())
                .collect();
        if !conflicting_ids.is_empty() {
            warn!(
                work_center = %draft.work_center_id,
                interval = %draft.interval,
                conflicts = ?conflicting_ids,
                "Rejected overlapping work order"
            );
            return Err(StoreError::Conflict(Conflict {
                work_center_id: draft.work_center_id,
                candidate: draft.interval,
                conflicting_ids,
            }));
        }

        let stored = match mode {
            CommitMode::Create => {
                let order = WorkOrder::from_draft(new_work_order_id(), draft);
                self.work_orders.push(order.clone());
                info!(id = %order.id, work_center = %order.work_center_id, interval = %order.interval, "Created work order");
                order
            }
            CommitMode::Update { id } => {
                let order = WorkOrder::from_draft(id, draft);
                if let Some(slot) = self.work_orders.iter_mut().find(|wo| wo.id == order.id) {
                    *slot = order.clone();
                }
                info!(id = %order.id, work_center = %order.work_center_id, interval = %order.interval, "Updated work order");
                order
            }
        };
        self.touch();
        Ok(stored)
    }

    fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.work_orders.iter().position(|wo| wo.id == id) else {
            return false;
        };
        self.work_orders.remove(index);
        self.touch();
        debug!(id, "Deleted work order");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimelineError;
    use crate::model::{WorkCenter, WorkOrderStatus};

    fn iv(start: &str, end: &str) -> Interval {
        Interval::parse(start, end).unwrap()
    }

    fn store() -> Schedule {
        let mut schedule = Schedule::new("test");
        schedule.work_centers = vec![WorkCenter::new("wc-1", "Line 1"), WorkCenter::new("wc-2", "Line 2")];
        schedule
    }

    #[test]
    fn create_assigns_prefixed_unique_ids() {
        let mut store = store();
        let a = store
            .commit(WorkOrderDraft::new("wc-1", "A", iv("2024-01-01", "2024-01-02")), CommitMode::Create)
            .unwrap();
        let b = store
            .commit(WorkOrderDraft::new("wc-1", "B", iv("2024-01-03", "2024-01-04")), CommitMode::Create)
            .unwrap();
        assert!(a.id.starts_with("wo-"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_by_row("wc-1").len(), 2);
        assert_eq!(store.get_by_id(&b.id), Some(&b));
    }

    #[test]
    fn listed_orders_outlive_the_row_id() {
        let mut store = store();
        store
            .commit(WorkOrderDraft::new("wc-1", "A", iv("2024-01-01", "2024-01-02")), CommitMode::Create)
            .unwrap();
        let listed = {
            let row = String::from("wc-1");
            store.list_by_row(&row)
        };
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "A");
        assert_eq!(store.orders_for("wc-2").count(), 0);
    }

    #[test]
    fn conflicting_create_leaves_store_unchanged() {
        let mut store = store();
        store
            .commit(WorkOrderDraft::new("wc-1", "A", iv("2024-01-01", "2024-01-05")), CommitMode::Create)
            .unwrap();
        let before = store.work_orders.clone();

        let err = store
            .commit(WorkOrderDraft::new("wc-1", "B", iv("2024-01-05", "2024-01-07")), CommitMode::Create)
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.work_orders, before);

        // Same dates on another row are fine.
        store
            .commit(WorkOrderDraft::new("wc-2", "B", iv("2024-01-05", "2024-01-07")), CommitMode::Create)
            .unwrap();
    }

    #[test]
    fn update_excludes_itself_and_keeps_position() {
        let mut store = store();
        let a = store
            .commit(WorkOrderDraft::new("wc-1", "A", iv("2024-01-01", "2024-01-05")), CommitMode::Create)
            .unwrap();
        store
            .commit(WorkOrderDraft::new("wc-1", "B", iv("2024-01-10", "2024-01-12")), CommitMode::Create)
            .unwrap();

        let mut draft = a.draft();
        draft.interval = iv("2024-01-02", "2024-01-08");
        draft.status = WorkOrderStatus::InProgress;
        let updated = store.commit(draft, CommitMode::Update { id: a.id.clone() }).unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(store.work_orders[0], updated);

        let mut draft = updated.draft();
        draft.interval = iv("2024-01-02", "2024-01-10");
        let err = store.commit(draft, CommitMode::Update { id: a.id.clone() }).unwrap_err();
        match err {
            StoreError::Conflict(conflict) => assert_eq!(conflict.conflicting_ids.len(), 1),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(store.work_orders[0].interval, iv("2024-01-02", "2024-01-08"));
    }

    #[test]
    fn rejects_invalid_drafts() {
        let mut store = store();
        let blank = WorkOrderDraft::new("wc-1", "   ", iv("2024-01-01", "2024-01-02"));
        assert_eq!(store.commit(blank, CommitMode::Create), Err(StoreError::EmptyName));

        let unknown = WorkOrderDraft::new("wc-9", "X", iv("2024-01-01", "2024-01-02"));
        assert!(matches!(
            store.commit(unknown, CommitMode::Create),
            Err(StoreError::NotFound { kind: "work center", .. })
        ));

        let mut inverted = WorkOrderDraft::new("wc-1", "X", iv("2024-01-01", "2024-01-02"));
        inverted.interval.start = inverted.interval.end.succ_opt().unwrap();
        assert!(matches!(
            store.commit(inverted, CommitMode::Create),
            Err(StoreError::Invalid(TimelineError::InvalidRange { .. }))
        ));

        let missing = WorkOrderDraft::new("wc-1", "X", iv("2024-01-01", "2024-01-02"));
        assert!(matches!(
            store.commit(missing, CommitMode::Update { id: "wo-nope".into() }),
            Err(StoreError::NotFound { kind: "work order", .. })
        ));
        assert!(store.work_orders.is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let mut store = store();
        let order = store
            .commit(WorkOrderDraft::new("wc-1", "  Cut blanks ", iv("2024-01-01", "2024-01-02")), CommitMode::Create)
            .unwrap();
        assert_eq!(order.name, "Cut blanks");
    }

    #[test]
    fn delete_frees_the_slot() {
        let mut store = store();
        let a = store
            .commit(WorkOrderDraft::new("wc-1", "A", iv("2024-01-01", "2024-01-05")), CommitMode::Create)
            .unwrap();
        assert!(store.delete(&a.id));
        assert!(!store.delete(&a.id));
        store
            .commit(WorkOrderDraft::new("wc-1", "B", iv("2024-01-03", "2024-01-04")), CommitMode::Create)
            .unwrap();
    }
}
