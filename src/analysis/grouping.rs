use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use std::collections::HashMap;

use crate::types::{MeasurementRecord, Metric};

/// A plottable measurement with its resolved timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl LogEntry {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// All plottable entries of one user, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLogs {
    pub user_id: String,
    pub entries: Vec<LogEntry>,
}

/// Partition `records` by user and sort each partition chronologically.
///
/// Users come out in order of first appearance. Entries with equal
/// timestamps keep their input order. Records without a usable date or
/// without a plottable value for `metric` are skipped, so a user whose
/// records are all skipped does not appear at all.
pub fn group_logs(records: &[MeasurementRecord], metric: Metric) -> Vec<UserLogs> {
    let mut groups: Vec<UserLogs> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut undated = 0usize;
    let mut no_value = 0usize;

    for record in records {
        let Some(timestamp) = record.timestamp() else {
            undated += 1;
            continue;
        };
        let Some(value) = record.value(metric) else {
            no_value += 1;
            continue;
        };

        let slot = *index.entry(record.user_id.as_str()).or_insert_with(|| {
            groups.push(UserLogs {
                user_id: record.user_id.clone(),
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(LogEntry { timestamp, value });
    }

    for group in &mut groups {
        group.entries.sort_by_key(|e| e.timestamp);
    }

    if undated > 0 || no_value > 0 {
        debug!(
            "{:?}: skipped {} undated and {} unplottable of {} records",
            metric,
            undated,
            no_value,
            records.len()
        );
    }

    groups
}
