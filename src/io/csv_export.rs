use std::path::Path;

use tracing::info;

use crate::error::FileError;
use crate::model::{format_iso_date, Schedule, WorkOrder};

pub const EXPORT_HEADER: [&str; 5] = ["Work Center", "Work Order", "Start Date", "End Date", "Status"];

/// Orders grouped by work center (document order), earliest start first.
fn export_order(schedule: &Schedule) -> Vec<&WorkOrder> {
    let row_index = |wc: &str| {
        schedule
            .work_centers
            .iter()
            .position(|c| c.id == wc)
            .unwrap_or(usize::MAX)
    };
    let mut orders: Vec<&WorkOrder> = schedule.work_orders.iter().collect();
    orders.sort_by(|a, b| {
        row_index(&a.work_center_id)
            .cmp(&row_index(&b.work_center_id))
            .then(a.interval.start.cmp(&b.interval.start))
            .then_with(|| a.id.cmp(&b.id))
    });
    orders
}

/// Write the schedule as semicolon-delimited CSV that [`super::import_csv`] reads back.
/// Returns the number of work orders written.
pub fn write_csv<W: std::io::Write>(schedule: &Schedule, writer: W) -> Result<usize, FileError> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;

    let orders = export_order(schedule);
    for order in &orders {
        let start = format_iso_date(order.interval.start);
        let end = format_iso_date(order.interval.end);
        wtr.write_record([
            schedule.work_center_name(&order.work_center_id),
            order.name.as_str(),
            start.as_str(),
            end.as_str(),
            order.status.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(orders.len())
}

pub fn export_csv(schedule: &Schedule, path: &Path) -> Result<usize, FileError> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(schedule, file)?;
    info!(path = %path.display(), work_orders = written, "Exported CSV");
    Ok(written)
}
