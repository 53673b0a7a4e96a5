use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{FileError, StoreError};
use crate::model::{parse_iso_date, Interval, Schedule, WorkOrderDraft, WorkOrderStatus};
use crate::store::{CommitMode, ScheduleStore};

/// One usable CSV row, before the work center is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// Work center id or display name as written in the file.
    pub work_center: String,
    pub name: String,
    pub status: WorkOrderStatus,
    pub interval: Interval,
}

/// Rows parsed from a file plus the number of data rows that were unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub rows: Vec<CsvRow>,
    pub skipped: usize,
}

/// Outcome of committing parsed rows into a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    /// Rows dropped while parsing.
    pub skipped: usize,
    /// Rows rejected because they overlap an existing order.
    pub conflicts: usize,
    /// Rows naming a work center the schedule does not have.
    pub unknown_work_centers: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Imported {} work order(s)", self.created)?;
        let rejected = self.skipped + self.conflicts + self.unknown_work_centers;
        if rejected > 0 {
            write!(
                f,
                " ({} invalid, {} overlapping, {} unknown work center)",
                self.skipped, self.conflicts, self.unknown_work_centers
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    WorkCenter,
    Name,
    Start,
    End,
    Status,
}

/// ISO first, then the day/month orders spreadsheets tend to produce.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = parse_iso_date(s) {
        return Some(d);
    }
    ["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Pick whichever of `;`, tab or `,` appears most in the header line.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "workcenter" | "workcentre" | "workcenterid" | "center" | "machine" | "line" | "resource" => {
            Some(Column::WorkCenter)
        }
        "workorder" | "name" | "order" | "ordername" | "task" | "title" | "label" => Some(Column::Name),
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "status" | "state" | "stage" => Some(Column::Status),
        _ => None,
    }
}

/// Parse CSV text. Fails only on unusable headers; bad rows are skipped and counted.
pub fn parse_csv(content: &str) -> Result<ParsedCsv, FileError> {
    let delimiter = detect_delimiter(content.lines().next().unwrap_or(""));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    let has = |col: Column| columns.contains(&Some(col));
    if ![Column::WorkCenter, Column::Name, Column::Start, Column::End]
        .into_iter()
        .all(has)
    {
        return Err(FileError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut parsed = ParsedCsv::default();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable CSV row");
                parsed.skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            columns
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .unwrap_or("")
        };

        let work_center = field(Column::WorkCenter);
        let name = field(Column::Name);
        if work_center.is_empty() || name.is_empty() {
            warn!(line, "Skipping CSV row without work center or name");
            parsed.skipped += 1;
            continue;
        }

        let (Some(start), Some(end)) = (parse_date(field(Column::Start)), parse_date(field(Column::End))) else {
            warn!(line, start = field(Column::Start), end = field(Column::End), "Skipping CSV row with invalid dates");
            parsed.skipped += 1;
            continue;
        };
        let interval = match Interval::new(start, end) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(line, error = %e, "Skipping CSV row");
                parsed.skipped += 1;
                continue;
            }
        };

        let status_text = field(Column::Status);
        let status = if status_text.is_empty() {
            WorkOrderStatus::Open
        } else {
            match status_text.parse() {
                Ok(status) => status,
                Err(e) => {
                    warn!(line, error = %e, "Unknown status, defaulting to open");
                    WorkOrderStatus::Open
                }
            }
        };

        parsed.rows.push(CsvRow {
            work_center: work_center.to_string(),
            name: name.to_string(),
            status,
            interval,
        });
    }

    if parsed.rows.is_empty() {
        return Err(FileError::NoRows { skipped: parsed.skipped });
    }
    Ok(parsed)
}

/// Resolve a work center by id, then by case-insensitive name.
fn resolve_work_center(schedule: &Schedule, key: &str) -> Option<String> {
    schedule
        .work_center(key)
        .or_else(|| schedule.work_centers.iter().find(|wc| wc.name.eq_ignore_ascii_case(key)))
        .map(|wc| wc.id.clone())
}

/// Commit parsed rows one by one. Overlapping rows are rejected like
/// interactive edits, including overlaps with rows imported earlier.
pub fn commit_rows(schedule: &mut Schedule, parsed: ParsedCsv) -> ImportSummary {
    let mut summary = ImportSummary {
        skipped: parsed.skipped,
        ..Default::default()
    };
    for row in parsed.rows {
        let Some(work_center_id) = resolve_work_center(schedule, &row.work_center) else {
            warn!(work_center = %row.work_center, name = %row.name, "Unknown work center in CSV");
            summary.unknown_work_centers += 1;
            continue;
        };
        let draft = WorkOrderDraft::new(work_center_id, row.name, row.interval).with_status(row.status);
        match schedule.commit(draft, CommitMode::Create) {
            Ok(_) => summary.created += 1,
            Err(StoreError::Conflict(_)) => summary.conflicts += 1,
            Err(e) => {
                warn!(error = %e, "CSV row rejected");
                summary.skipped += 1;
            }
        }
    }
    summary
}

/// Read a CSV file and commit its rows into `schedule`.
pub fn import_csv(schedule: &mut Schedule, path: &Path) -> Result<ImportSummary, FileError> {
    let content = std::fs::read_to_string(path)?;
    let parsed = parse_csv(&content)?;
    let summary = commit_rows(schedule, parsed);
    info!(path = %path.display(), created = summary.created, skipped = summary.skipped,
        conflicts = summary.conflicts, unknown = summary.unknown_work_centers, "Imported CSV");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkCenter;

    fn schedule() -> Schedule {
        let mut schedule = Schedule::new("csv");
        schedule.work_centers = vec![WorkCenter::new("wc-1", "Extrusion Line A"), WorkCenter::new("wc-2", "CNC Machine 1")];
        schedule
    }

    #[test]
    fn detects_delimiters() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn headers_match_loosely() {
        let csv = "work_center,Work-Order,START DATE,end date,State\n\
                   wc-1,Batch 1,2024-01-01,2024-01-03,done\n";
        let parsed = parse_csv(csv).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].status, WorkOrderStatus::Complete);
        assert_eq!(parsed.rows[0].interval, Interval::parse("2024-01-01", "2024-01-03").unwrap());
    }

    #[test]
    fn bad_rows_are_counted() {
        let csv = "Work Center;Work Order;Start Date;End Date;Status\n\
                   wc-1;Good;2024-01-01;2024-01-03;open\n\
                   wc-1;;2024-01-01;2024-01-03;open\n\
                   wc-1;Bad date;2024-02-30;2024-03-03;open\n\
                   wc-1;Inverted;2024-03-05;2024-03-01;open\n\
                   wc-1;Other format;05/01/2024;07/01/2024;\n";
        let parsed = parse_csv(csv).unwrap();
        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].interval, Interval::parse("2024-01-05", "2024-01-07").unwrap());
        assert_eq!(parsed.rows[1].status, WorkOrderStatus::Open);
    }

    #[test]
    fn missing_columns_and_empty_files_fail() {
        assert!(matches!(
            parse_csv("Name;Start;End\nx;2024-01-01;2024-01-02\n"),
            Err(FileError::MissingColumns { .. })
        ));
        assert!(matches!(
            parse_csv("Work Center;Name;Start;End\nwc-1;x;nope;2024-01-02\n"),
            Err(FileError::NoRows { skipped: 1 })
        ));
    }

    #[test]
    fn commit_resolves_names_and_rejects_overlaps() {
        let mut schedule = schedule();
        let csv = "Work Center;Work Order;Start Date;End Date\n\
                   extrusion line a;A;2024-01-01;2024-01-05\n\
                   wc-1;B;2024-01-05;2024-01-08\n\
                   wc-2;C;2024-01-05;2024-01-08\n\
                   Paint Shop;D;2024-01-01;2024-01-02\n";
        let summary = commit_rows(&mut schedule, parse_csv(csv).unwrap());
        assert_eq!(
            summary,
            ImportSummary {
                created: 2,
                skipped: 0,
                conflicts: 1,
                unknown_work_centers: 1
            }
        );
        assert_eq!(schedule.list_by_row("wc-1").len(), 1);
        assert_eq!(schedule.list_by_row("wc-2").len(), 1);
    }
}
