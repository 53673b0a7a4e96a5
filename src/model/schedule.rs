use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{WorkCenter, WorkOrder};

/// The schedule document: every work center and work order plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub name: String,
    pub work_centers: Vec<WorkCenter>,
    pub work_orders: Vec<WorkOrder>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            name: "Untitled Schedule".to_string(),
            work_centers: Vec::new(),
            work_orders: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Schedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn work_center(&self, id: &str) -> Option<&WorkCenter> {
        self.work_centers.iter().find(|wc| wc.id == id)
    }

    /// Display name for a work center id; `"Unknown"` when it does not exist.
    pub fn work_center_name(&self, id: &str) -> &str {
        self.work_center(id).map(|wc| wc.name.as_str()).unwrap_or("Unknown")
    }

    /// Work orders on one work center, in document order.
    pub fn orders_for<'a, 'b>(&'a self, work_center_id: &'b str) -> impl Iterator<Item = &'a WorkOrder> + 'b
    where
        'a: 'b,
    {
        self.work_orders
            .iter()
            .filter(move |wo| wo.work_center_id == work_center_id)
    }
}
