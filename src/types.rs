//! # Common Types
//!
//! This module contains the types shared across the crate: the measurement
//! and profile rows exported from the backend, the group snapshot read by the
//! dashboard, and the tagged chart structure produced by the aggregator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::color::SeriesColor;
use crate::utils::dates;

/// The measurement a chart is drawn for.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Weight,
    Steps,
}

/// How the series of a metric are laid out on the x axis.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PlotMode {
    /// Every series shares one categorical date axis; missing days are gaps.
    Aligned,
    /// Every series carries its own dated points on a continuous time axis.
    Native,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Weight, Metric::Steps];

    /// Short name used on toggle buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Weight => "Weight",
            Metric::Steps => "Steps",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Weight => "Weight Progress",
            Metric::Steps => "Steps Progress",
        }
    }

    pub fn axis_title(&self) -> &'static str {
        match self {
            Metric::Weight => "Weight (kg)",
            Metric::Steps => "Steps",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Weight => "kg",
            Metric::Steps => "steps",
        }
    }

    /// Message shown instead of a chart when nothing can be plotted.
    pub fn empty_message(&self) -> &'static str {
        match self {
            Metric::Weight => "No weight data available for the group members.",
            Metric::Steps => "No steps data available",
        }
    }

    pub fn plot_mode(&self) -> PlotMode {
        match self {
            Metric::Weight => PlotMode::Aligned,
            Metric::Steps => PlotMode::Native,
        }
    }

    /// Format a value with its unit, e.g. `80.0 kg` or `12,345 steps`.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Metric::Weight => format!("{:.1} kg", value),
            Metric::Steps => format!("{} steps", group_thousands(value.round() as u64)),
        }
    }

    /// Format a date the way tooltips show it, e.g. `Jan 3, 2024`.
    pub fn format_tooltip_date(&self, date: NaiveDate) -> String {
        date.format(TOOLTIP_DATE_FORMAT).to_string()
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `chrono` format string for tooltip dates (`MMM d, yyyy`).
pub const TOOLTIP_DATE_FORMAT: &str = "%b %-d, %Y";

/// A single weight/steps log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    /// Weight in kilograms; older exports name this column `status`.
    #[serde(default, alias = "status")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub steps: Option<i64>,
    /// The day the measurement is for.
    #[serde(default)]
    pub log_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl MeasurementRecord {
    /// The logical timestamp: `log_date` when it parses, otherwise `created_at`.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.log_date
            .as_deref()
            .and_then(dates::parse_timestamp)
            .or_else(|| self.created_at.as_deref().and_then(dates::parse_timestamp))
    }

    /// The calendar day of [`timestamp`](Self::timestamp).
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    /// The plottable value for `metric`, if any.
    ///
    /// Weights must be positive and finite. Steps must be positive: a zero
    /// step count means nothing was recorded, not that nobody walked.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weight => self.weight.filter(|w| w.is_finite() && *w > 0.0),
            Metric::Steps => self.steps.filter(|s| *s > 0).map(|s| s as f64),
        }
    }
}

/// A member profile. Only `id` and `full_name` matter for charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Profile {
    /// First letter of the name, shown when there is no avatar.
    pub fn initial(&self) -> String {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: String,
}

impl Group {
    /// A group can only be deleted once every other member has left.
    pub fn can_delete(&self, member_count: usize) -> bool {
        member_count <= 1
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    /// One-click invite link for the group.
    pub fn join_link(&self, origin: &str) -> String {
        format!(
            "{}/dashboard/groups/join?groupId={}&autoFill=true",
            origin.trim_end_matches('/'),
            self.id
        )
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "No description",
        }
    }
}

/// Everything the dashboard needs about one group, as exported from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub logs: Vec<MeasurementRecord>,
}

impl GroupSnapshot {
    pub fn member_count(&self) -> usize {
        if self.member_ids.is_empty() {
            self.profiles.len()
        } else {
            self.member_ids.len()
        }
    }

    pub fn group_id(&self) -> &str {
        self.group.as_ref().map(|g| g.id.as_str()).unwrap_or("")
    }
}

/// Granularity of a continuous time axis.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
}

/// Continuous time axis used by natively-timed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub unit: TimeUnit,
    pub tooltip_format: String,
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl TimeScale {
    pub fn days(min: NaiveDate, max: NaiveDate) -> Self {
        Self {
            unit: TimeUnit::Day,
            tooltip_format: TOOLTIP_DATE_FORMAT.to_string(),
            min,
            max,
        }
    }

    /// Number of whole days covered, at least zero.
    pub fn span_days(&self) -> i64 {
        (self.max - self.min).num_days().max(0)
    }
}

/// The shared x dimension of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis_kind", content = "axis", rename_all = "snake_case")]
pub enum Axis {
    Categorical(Vec<NaiveDate>),
    TimeScale(TimeScale),
}

impl Axis {
    pub fn is_empty(&self) -> bool {
        match self {
            Axis::Categorical(dates) => dates.is_empty(),
            Axis::TimeScale(_) => false,
        }
    }
}

/// A point of a natively-timed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativePoint {
    /// Calendar day, used for the x position.
    pub date: NaiveDate,
    /// Untruncated timestamp, used for tooltips.
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum SeriesPoints {
    /// One entry per categorical axis date; `None` marks a gap.
    Aligned(Vec<Option<f64>>),
    Native(Vec<NativePoint>),
}

impl SeriesPoints {
    pub fn len(&self) -> usize {
        match self {
            SeriesPoints::Aligned(values) => values.len(),
            SeriesPoints::Native(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values that are actually plotted, in order.
    pub fn present_values(&self) -> Vec<f64> {
        match self {
            SeriesPoints::Aligned(values) => values.iter().flatten().copied().collect(),
            SeriesPoints::Native(points) => points.iter().map(|p| p.value).collect(),
        }
    }
}

/// Presentation hints for one series. None of these affect the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub border_width: f64,
    pub tension: f64,
    pub point_radius: f64,
    pub point_hover_radius: f64,
    pub point_hit_radius: f64,
    /// Bridge absent points instead of breaking the line.
    pub span_gaps: bool,
}

impl SeriesStyle {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Weight => Self {
                border_width: 2.5,
                tension: 0.4,
                point_radius: 5.0,
                point_hover_radius: 8.0,
                point_hit_radius: 10.0,
                span_gaps: true,
            },
            Metric::Steps => Self {
                border_width: 2.0,
                tension: 0.1,
                point_radius: 3.0,
                point_hover_radius: 6.0,
                point_hit_radius: 8.0,
                span_gaps: true,
            },
        }
    }
}

/// One user's line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub user_id: String,
    pub label: String,
    pub color: SeriesColor,
    pub points: SeriesPoints,
    pub style: SeriesStyle,
}

/// Aggregated, render-ready chart for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub metric: Metric,
    pub axis: Axis,
    pub series: Vec<NamedSeries>,
}

impl ChartData {
    /// A chart with nothing to draw.
    pub fn empty(metric: Metric) -> Self {
        let axis = match metric.plot_mode() {
            PlotMode::Aligned => Axis::Categorical(Vec::new()),
            PlotMode::Native => {
                let epoch = NaiveDate::default();
                Axis::TimeScale(TimeScale::days(epoch, epoch))
            }
        };
        Self {
            metric,
            axis,
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Every plotted value across all series.
    pub fn all_values(&self) -> Vec<f64> {
        self.series
            .iter()
            .flat_map(|s| s.points.present_values())
            .collect()
    }

    /// Tooltip text for a point, e.g. `Jan 3, 2024 - Alice: 78.0 kg`.
    ///
    /// Returns `None` for gaps and out-of-range indices.
    pub fn tooltip(&self, series: usize, point: usize) -> Option<String> {
        let s = self.series.get(series)?;
        let (date, value) = match (&self.axis, &s.points) {
            (Axis::Categorical(dates), SeriesPoints::Aligned(values)) => {
                ((*dates.get(point)?), (*values.get(point)?)?)
            }
            (_, SeriesPoints::Native(points)) => {
                let p = points.get(point)?;
                (p.timestamp.date(), p.value)
            }
            _ => return None,
        };
        Some(format!(
            "{} - {}: {}",
            self.metric.format_tooltip_date(date),
            s.label,
            self.metric.format_value(value)
        ))
    }
}

/// Key for the per-group chart cache.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    /// The group the chart belongs to (empty for ad-hoc snapshots)
    pub group_id: String,
    /// The metric the chart was aggregated for
    pub metric: Metric,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(weight: Option<f64>, steps: Option<i64>) -> MeasurementRecord {
        MeasurementRecord {
            id: "1".to_string(),
            user_id: "A".to_string(),
            weight,
            steps,
            log_date: Some("2024-01-01".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_status_column_alias() {
        let json = r#"{"id":"x","user_id":"A","status":81.5,"created_at":"2024-01-02T10:00:00Z"}"#;
        let rec: MeasurementRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.weight, Some(81.5));
        assert_eq!(rec.date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_log_date_falls_back_to_created_at() {
        let mut rec = record(Some(80.0), None);
        rec.log_date = Some("not a date".to_string());
        rec.created_at = Some("2024-03-05 07:15:00".to_string());
        assert_eq!(rec.date(), NaiveDate::from_ymd_opt(2024, 3, 5));

        rec.created_at = None;
        assert_eq!(rec.timestamp(), None);
    }

    #[test]
    fn test_plottable_values() {
        assert_eq!(record(Some(80.0), None).value(Metric::Weight), Some(80.0));
        assert_eq!(record(Some(0.0), None).value(Metric::Weight), None);
        assert_eq!(record(Some(f64::NAN), None).value(Metric::Weight), None);
        assert_eq!(record(None, Some(0)).value(Metric::Steps), None);
        assert_eq!(record(None, Some(-3)).value(Metric::Steps), None);
        assert_eq!(record(None, Some(4200)).value(Metric::Steps), Some(4200.0));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(Metric::Weight.format_value(80.0), "80.0 kg");
        assert_eq!(Metric::Weight.format_value(78.46), "78.5 kg");
        assert_eq!(Metric::Steps.format_value(12345.0), "12,345 steps");
        assert_eq!(Metric::Steps.format_value(999.0), "999 steps");
        assert_eq!(Metric::Steps.format_value(1_000_000.0), "1,000,000 steps");
    }

    #[test]
    fn test_tooltip_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(Metric::Weight.format_tooltip_date(date), "Jan 3, 2024");
    }

    #[test]
    fn test_group_rules() {
        let group = Group {
            id: "g-1".to_string(),
            title: "Summer Cut".to_string(),
            description: None,
            created_by: "A".to_string(),
        };
        assert!(group.can_delete(1));
        assert!(!group.can_delete(2));
        assert!(group.is_owner("A"));
        assert_eq!(group.description_or_default(), "No description");
        assert_eq!(
            group.join_link("https://example.com/"),
            "https://example.com/dashboard/groups/join?groupId=g-1&autoFill=true"
        );
    }

    #[test]
    fn test_member_count_prefers_member_ids() {
        let mut snapshot = GroupSnapshot::default();
        snapshot.profiles.push(Profile {
            id: "A".to_string(),
            full_name: "Alice".to_string(),
            avatar_url: None,
            height: None,
            weight: None,
        });
        assert_eq!(snapshot.member_count(), 1);

        snapshot.member_ids = vec!["A".to_string(), "B".to_string()];
        assert_eq!(snapshot.member_count(), 2);
    }

    #[test]
    fn test_profile_initial() {
        let profile = Profile {
            id: "A".to_string(),
            full_name: "alice".to_string(),
            avatar_url: None,
            height: None,
            weight: None,
        };
        assert_eq!(profile.initial(), "A");
    }
}
