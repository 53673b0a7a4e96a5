pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::{export_csv, write_csv};
pub use csv_import::{commit_rows, import_csv, parse_csv, CsvRow, ImportSummary, ParsedCsv};
pub use file::{load_or_seed, load_schedule, save_schedule};
