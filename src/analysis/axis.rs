use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::grouping::UserLogs;
use crate::types::TimeScale;

/// Distinct calendar days across all users, ascending.
pub fn build_date_axis(groups: &[UserLogs]) -> Vec<NaiveDate> {
    groups
        .iter()
        .flat_map(|g| g.entries.iter().map(|e| e.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Day-granular time scale spanning every entry, or `None` without entries.
pub fn build_time_scale(groups: &[UserLogs]) -> Option<TimeScale> {
    let mut dates = groups.iter().flat_map(|g| g.entries.iter().map(|e| e.date()));
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(TimeScale::days(min, max))
}
