use serde::{Deserialize, Serialize};

/// A production line, machine or work area that work orders are scheduled on.
/// One timeline row per work center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WorkCenterDocument", into = "WorkCenterDocument")]
pub struct WorkCenter {
    pub id: String,
    pub name: String,
}

impl WorkCenter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkCenterDocument {
    doc_id: String,
    #[serde(default = "work_center_doc_type")]
    doc_type: String,
    data: WorkCenterData,
}

#[derive(Serialize, Deserialize)]
struct WorkCenterData {
    name: String,
}

fn work_center_doc_type() -> String {
    "workCenter".to_string()
}

impl From<WorkCenterDocument> for WorkCenter {
    fn from(doc: WorkCenterDocument) -> Self {
        Self {
            id: doc.doc_id,
            name: doc.data.name,
        }
    }
}

impl From<WorkCenter> for WorkCenterDocument {
    fn from(wc: WorkCenter) -> Self {
        Self {
            doc_id: wc.id,
            doc_type: work_center_doc_type(),
            data: WorkCenterData { name: wc.name },
        }
    }
}
