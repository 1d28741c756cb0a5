//! Turns grouped logs into labelled, coloured chart series.

use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

use super::axis::{build_date_axis, build_time_scale};
use super::grouping::{group_logs, LogEntry, UserLogs};
use crate::types::{
    Axis, ChartData, MeasurementRecord, Metric, NamedSeries, NativePoint, PlotMode, Profile,
    SeriesPoints, SeriesStyle,
};
use crate::utils::color::series_color;

/// Aggregate raw records into a render-ready chart for `metric`.
///
/// Returns [`ChartData::empty`] when nothing is plottable; callers should
/// show [`Metric::empty_message`] instead of drawing an empty canvas.
pub fn aggregate(
    records: &[MeasurementRecord],
    profiles: &[Profile],
    metric: Metric,
) -> ChartData {
    let groups = group_logs(records, metric);
    if groups.is_empty() {
        return ChartData::empty(metric);
    }

    let axis = match metric.plot_mode() {
        PlotMode::Aligned => Axis::Categorical(build_date_axis(&groups)),
        PlotMode::Native => match build_time_scale(&groups) {
            Some(scale) => Axis::TimeScale(scale),
            None => return ChartData::empty(metric),
        },
    };

    let series = build_series(&groups, profiles, metric, &axis);
    debug!(
        "aggregated {} records into {} {:?} series",
        records.len(),
        series.len(),
        metric
    );

    ChartData {
        metric,
        axis,
        series,
    }
}

/// Build one series per user group, in the order given.
///
/// The series at position `i` is coloured by `series_color(i)` and, without
/// a matching profile, labelled `User {i + 1}`.
pub fn build_series(
    groups: &[UserLogs],
    profiles: &[Profile],
    metric: Metric,
    axis: &Axis,
) -> Vec<NamedSeries> {
    let mut names: HashMap<&str, &str> = HashMap::with_capacity(profiles.len());
    for profile in profiles {
        names
            .entry(profile.id.as_str())
            .or_insert(profile.full_name.as_str());
    }

    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let label = names
                .get(group.user_id.as_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("User {}", index + 1));

            let points = match axis {
                Axis::Categorical(dates) => SeriesPoints::Aligned(aligned_points(&group.entries, dates)),
                Axis::TimeScale(_) => SeriesPoints::Native(native_points(&group.entries)),
            };

            NamedSeries {
                user_id: group.user_id.clone(),
                label,
                color: series_color(index),
                points,
                style: SeriesStyle::for_metric(metric),
            }
        })
        .collect()
}

/// One value per axis date: the user's first entry that day, or a gap.
fn aligned_points(entries: &[LogEntry], dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let mut by_date: HashMap<NaiveDate, f64> = HashMap::with_capacity(entries.len());
    for entry in entries {
        by_date.entry(entry.date()).or_insert(entry.value);
    }
    dates.iter().map(|d| by_date.get(d).copied()).collect()
}

fn native_points(entries: &[LogEntry]) -> Vec<NativePoint> {
    entries
        .iter()
        .map(|e| NativePoint {
            date: e.date(),
            timestamp: e.timestamp,
            value: e.value,
        })
        .collect()
}
