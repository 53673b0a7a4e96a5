use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::FileError;
use crate::model::Schedule;
use crate::sample::sample_schedule;

/// Save a schedule document as pretty JSON, creating parent directories.
pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<(), FileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), work_orders = schedule.work_orders.len(), "Saved schedule");
    Ok(())
}

/// Load a schedule document. Dates are validated while parsing.
pub fn load_schedule(path: &Path) -> Result<Schedule, FileError> {
    let json = std::fs::read_to_string(path)?;
    let schedule: Schedule = serde_json::from_str(&json)?;
    ensure_unique_ids(&schedule)?;
    info!(
        path = %path.display(),
        work_centers = schedule.work_centers.len(),
        work_orders = schedule.work_orders.len(),
        "Loaded schedule"
    );
    Ok(schedule)
}

/// Orders and work centers are looked up by id, so each id may appear once.
fn ensure_unique_ids(schedule: &Schedule) -> Result<(), FileError> {
    let mut seen = HashSet::new();
    if let Some(wc) = schedule.work_centers.iter().find(|wc| !seen.insert(wc.id.as_str())) {
        return Err(FileError::DuplicateId {
            kind: "work center",
            id: wc.id.clone(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(wo) = schedule.work_orders.iter().find(|wo| !seen.insert(wo.id.as_str())) {
        return Err(FileError::DuplicateId {
            kind: "work order",
            id: wo.id.clone(),
        });
    }
    Ok(())
}

/// Load the autosave document, or seed sample data when it is missing or unreadable.
pub fn load_or_seed(path: &Path, today: NaiveDate) -> Schedule {
    if !path.exists() {
        info!(path = %path.display(), "No saved schedule, seeding sample data");
        return sample_schedule(today);
    }
    match load_schedule(path) {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Saved schedule unreadable, seeding sample data");
            sample_schedule(today)
        }
    }
}
