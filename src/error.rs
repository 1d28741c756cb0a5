//! # Error Types
//!
//! Failures that can surface while loading snapshots or rendering charts.
//! Aggregation itself never fails: malformed records degrade to a smaller
//! chart instead of an error.

use std::path::PathBuf;

/// Errors produced by the snapshot loader, the renderer and the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plot error: {0}")]
    Plot(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
