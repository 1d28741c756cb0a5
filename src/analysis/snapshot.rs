use log::info;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

use crate::error::{Error, Result};
use crate::types::GroupSnapshot;

/// Read a group snapshot exported from the backend.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<GroupSnapshot> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let snapshot: GroupSnapshot = serde_json::from_str(&raw).map_err(|source| Error::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "loaded snapshot {}: {} profiles, {} logs",
        path.display(),
        snapshot.profiles.len(),
        snapshot.logs.len()
    );
    Ok(snapshot)
}

/// Load a snapshot asynchronously
pub async fn load_snapshot_async(path: PathBuf) -> Result<GroupSnapshot> {
    // File reads and JSON parsing are blocking
    spawn_blocking(move || load_snapshot(&path)).await?
}
