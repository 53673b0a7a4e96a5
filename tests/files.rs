use std::path::PathBuf;

use chrono::NaiveDate;
use shopfloor_timeline::engine::overlaps;
use shopfloor_timeline::io::{export_csv, import_csv, load_schedule, save_schedule};
use shopfloor_timeline::model::Interval;
use shopfloor_timeline::sample::sample_schedule;
use shopfloor_timeline::{CommitMode, FileError, ScheduleStore};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shopfloor-it-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[test]
fn edited_schedule_survives_save_and_load() {
    let dir = scratch("store-round-trip");
    let path = dir.join("schedule.json");

    let mut schedule = sample_schedule(today());
    let original = schedule.get_by_id("wo-003").cloned().unwrap();
    let mut draft = original.draft();
    draft.interval = Interval::parse("2024-06-18", "2024-06-20").unwrap();
    schedule
        .commit(draft, CommitMode::Update { id: original.id.clone() })
        .unwrap();
    save_schedule(&schedule, &path).unwrap();

    let loaded = load_schedule(&path).unwrap();
    assert_eq!(loaded.work_orders, schedule.work_orders);
    assert_eq!(
        loaded.get_by_id("wo-003").map(|wo| wo.interval),
        Some(Interval::parse("2024-06-18", "2024-06-20").unwrap())
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn csv_import_goes_through_the_conflict_check() {
    let dir = scratch("csv-import");
    let path = dir.join("orders.csv");
    std::fs::write(
        &path,
        "Work Center,Work Order,Start Date,End Date,Status\n\
         CNC Machine 1,Spindle Batch,2024-06-24,2024-06-26,open\n\
         CNC Machine 1,Clashing Batch,2024-06-20,2024-06-25,open\n\
         Packaging Line,Pallet Run,2024-06-26,2024-06-28,in progress\n\
         Packaging Line,Missing date,,2024-06-28,open\n",
    )
    .unwrap();

    let mut schedule = sample_schedule(today());
    let summary = import_csv(&mut schedule, &path).unwrap();
    assert_eq!(summary.created, 2);
    assert_eq!(summary.conflicts, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(schedule.work_orders.len(), 12);

    for row in &schedule.work_centers {
        let orders = schedule.list_by_row(&row.id);
        for (i, a) in orders.iter().enumerate() {
            for b in &orders[i + 1..] {
                assert!(!overlaps(&a.interval, &b.interval), "{} vs {}", a.id, b.id);
            }
        }
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn export_writes_every_order() {
    let dir = scratch("csv-export");
    let path = dir.join("out.csv");
    let schedule = sample_schedule(today());
    assert_eq!(export_csv(&schedule, &path).unwrap(), 10);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 11);
    assert!(text.starts_with("Work Center;Work Order;Start Date;End Date;Status"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn import_reports_missing_file() {
    let mut schedule = sample_schedule(today());
    let err = import_csv(&mut schedule, &scratch("missing").join("nope.csv")).unwrap_err();
    assert!(matches!(err, FileError::Io(_)));
}
