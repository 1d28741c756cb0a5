mod cache;
pub mod axis;
pub mod grouping;
pub mod series;
pub mod snapshot;

pub use axis::{build_date_axis, build_time_scale};
pub use cache::ChartCache;
pub use grouping::{group_logs, LogEntry, UserLogs};
pub use series::{aggregate, build_series};
pub use snapshot::{load_snapshot, load_snapshot_async};
