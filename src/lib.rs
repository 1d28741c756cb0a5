//! # Group Weight Tracking Library
//!
//! `weightstats` turns the weight and step logs of a group's members into
//! comparable progress charts. Members, profiles and logs are exported from
//! the hosted backend as a JSON snapshot; this crate aggregates them into
//! per-member series and renders them, either headless or in a small
//! desktop dashboard.
//!
//! ## Features
//!
//! - Group logs by member and sort them chronologically
//! - Align weight series on a shared date axis with explicit gaps
//! - Plot step series on a continuous time axis, ignoring empty days
//! - Deterministic per-member colours
//! - PNG rendering with a cached async variant
//! - Dashboard with group details, paginated members and per-member logs
//!
//! ## Example
//!
//! ```
//! use weightstats::analysis::aggregate;
//! use weightstats::types::{MeasurementRecord, Metric, Profile};
//!
//! let logs = vec![MeasurementRecord {
//!     id: "1".to_string(),
//!     user_id: "A".to_string(),
//!     weight: Some(80.0),
//!     steps: None,
//!     log_date: Some("2024-01-01".to_string()),
//!     created_at: None,
//! }];
//! let profiles = vec![Profile {
//!     id: "A".to_string(),
//!     full_name: "Alice".to_string(),
//!     avatar_url: None,
//!     height: None,
//!     weight: None,
//! }];
//!
//! let chart = aggregate(&logs, &profiles, Metric::Weight);
//! assert_eq!(chart.series[0].label, "Alice");
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::aggregate;
pub use app::App as WeightStatsApp;
pub use config::Config;
pub use error::{Error, Result};
pub use types::{ChartData, GroupSnapshot, Metric};
