pub mod interval;
pub mod schedule;
pub mod timeline;
pub mod work_center;
pub mod work_order;

pub use interval::{format_iso_date, parse_iso_date, Interval};
pub use schedule::Schedule;
pub use timeline::{BarGeometry, DateRange, TimelineColumn, TimelineViewport, ZoomLevel};
pub use work_center::WorkCenter;
pub use work_order::{WorkOrder, WorkOrderDraft, WorkOrderStatus};
