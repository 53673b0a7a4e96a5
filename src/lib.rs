//! Shop-floor timeline: work orders scheduled on work centers, laid out on a
//! zoomable time axis with overlap-free lanes and conflict-checked edits.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod sample;
pub mod store;

pub use error::{Conflict, FileError, StoreError, TimelineError};
pub use store::{CommitMode, ScheduleStore};
