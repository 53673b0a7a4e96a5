use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::interval::{format_iso_date, Interval};
use crate::error::TimelineError;

/// Lifecycle state of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    Complete,
    Blocked,
}

impl WorkOrderStatus {
    pub fn all() -> &'static [WorkOrderStatus] {
        &[
            WorkOrderStatus::Open,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Complete,
            WorkOrderStatus::Blocked,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "Open",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::Complete => "Complete",
            WorkOrderStatus::Blocked => "Blocked",
        }
    }

    /// Token used in documents and CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "open",
            WorkOrderStatus::InProgress => "in-progress",
            WorkOrderStatus::Complete => "complete",
            WorkOrderStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkOrderStatus {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "new" | "planned" | "not started" | "not-started" => Ok(WorkOrderStatus::Open),
            "in-progress" | "in progress" | "in_progress" | "active" | "started" => {
                Ok(WorkOrderStatus::InProgress)
            }
            "complete" | "completed" | "done" | "finished" => Ok(WorkOrderStatus::Complete),
            "blocked" | "on hold" | "on-hold" => Ok(WorkOrderStatus::Blocked),
            _ => Err(TimelineError::InvalidStatus(s.to_string())),
        }
    }
}

/// A scheduled, date-ranged task on one work center.
///
/// Serialized in the document shape
/// `{docId, docType: "workOrder", data: {name, workCenterId, status, startDate, endDate}}`;
/// dates are parsed strictly on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkOrderDocument", into = "WorkOrderDocument")]
pub struct WorkOrder {
    pub id: String,
    pub work_center_id: String,
    pub name: String,
    pub status: WorkOrderStatus,
    pub interval: Interval,
}

impl WorkOrder {
    pub fn from_draft(id: impl Into<String>, draft: WorkOrderDraft) -> Self {
        Self {
            id: id.into(),
            work_center_id: draft.work_center_id,
            name: draft.name,
            status: draft.status,
            interval: draft.interval,
        }
    }

    /// Editable copy of this order's fields.
    pub fn draft(&self) -> WorkOrderDraft {
        WorkOrderDraft {
            work_center_id: self.work_center_id.clone(),
            name: self.name.clone(),
            status: self.status,
            interval: self.interval,
        }
    }
}

/// Candidate fields for a create or update, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderDraft {
    pub work_center_id: String,
    pub name: String,
    pub status: WorkOrderStatus,
    pub interval: Interval,
}

impl WorkOrderDraft {
    pub fn new(work_center_id: impl Into<String>, name: impl Into<String>, interval: Interval) -> Self {
        Self {
            work_center_id: work_center_id.into(),
            name: name.into(),
            status: WorkOrderStatus::Open,
            interval,
        }
    }

    pub fn with_status(mut self, status: WorkOrderStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkOrderDocument {
    doc_id: String,
    #[serde(default = "work_order_doc_type")]
    doc_type: String,
    data: WorkOrderData,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkOrderData {
    name: String,
    work_center_id: String,
    #[serde(default)]
    status: WorkOrderStatus,
    start_date: String,
    end_date: String,
}

fn work_order_doc_type() -> String {
    "workOrder".to_string()
}

impl TryFrom<WorkOrderDocument> for WorkOrder {
    type Error = TimelineError;

    fn try_from(doc: WorkOrderDocument) -> Result<Self, Self::Error> {
        let interval = Interval::parse(&doc.data.start_date, &doc.data.end_date)?;
        Ok(Self {
            id: doc.doc_id,
            work_center_id: doc.data.work_center_id,
            name: doc.data.name,
            status: doc.data.status,
            interval,
        })
    }
}

impl From<WorkOrder> for WorkOrderDocument {
    fn from(order: WorkOrder) -> Self {
        Self {
            doc_id: order.id,
            doc_type: work_order_doc_type(),
            data: WorkOrderData {
                name: order.name,
                work_center_id: order.work_center_id,
                status: order.status,
                start_date: format_iso_date(order.interval.start),
                end_date: format_iso_date(order.interval.end),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_shape_round_trips() {
        let json = r#"{
            "docId": "wo-001",
            "docType": "workOrder",
            "data": {
                "name": "Extrude PVC profiles",
                "workCenterId": "wc-001",
                "status": "in-progress",
                "startDate": "2024-01-01",
                "endDate": "2024-01-05"
            }
        }"#;
        let order: WorkOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, WorkOrderStatus::InProgress);
        assert_eq!(order.interval, Interval::parse("2024-01-01", "2024-01-05").unwrap());

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["docType"], "workOrder");
        assert_eq!(value["data"]["workCenterId"], "wc-001");
        assert_eq!(value["data"]["endDate"], "2024-01-05");
    }

    #[test]
    fn malformed_document_dates_are_rejected() {
        let json = r#"{"docId":"wo-9","data":{"name":"x","workCenterId":"wc-1",
            "startDate":"01/02/2024","endDate":"2024-01-05"}}"#;
        let err = serde_json::from_str::<WorkOrder>(json).unwrap_err();
        assert!(err.to_string().contains("invalid date '01/02/2024'"), "{err}");

        let inverted = r#"{"docId":"wo-9","data":{"name":"x","workCenterId":"wc-1",
            "startDate":"2024-01-05","endDate":"2024-01-01"}}"#;
        assert!(serde_json::from_str::<WorkOrder>(inverted).is_err());
    }

    #[test]
    fn status_tokens() {
        assert_eq!("In Progress".parse::<WorkOrderStatus>().unwrap(), WorkOrderStatus::InProgress);
        assert_eq!("done".parse::<WorkOrderStatus>().unwrap(), WorkOrderStatus::Complete);
        assert!("paused".parse::<WorkOrderStatus>().is_err());
        for s in WorkOrderStatus::all() {
            assert_eq!(s.as_str().parse::<WorkOrderStatus>().unwrap(), *s);
        }
    }
}
