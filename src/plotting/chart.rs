use chrono::Duration as ChronoDuration;
use log::debug;
use lru::LruCache;
use once_cell::sync::Lazy;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex as TokioMutex;

use super::styles::{ChartStyle, ChartTheme};
use crate::app::App;
use crate::error::{Error, Result};
use crate::types::{Axis, ChartData, Metric, SeriesPoints};
use crate::utils::dates::axis_label;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const PLOT_CACHE_TTL: Duration = Duration::from_secs(300);

// Global plot cache with a 5-minute expiration
static PLOT_CACHE: Lazy<Arc<TokioMutex<LruCache<PlotCacheKey, (Vec<u8>, Instant)>>>> = Lazy::new(|| {
    let capacity = NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN);
    Arc::new(TokioMutex::new(LruCache::new(capacity)))
});

#[derive(Hash, Eq, PartialEq)]
pub(crate) struct PlotCacheKey {
    metric: Metric,
    size: (u32, u32),
    data_hash: u64,
}

impl PlotCacheKey {
    pub(crate) fn new(data: &ChartData, style: &ChartStyle) -> Result<Self> {
        // f64 is not Hash, so fingerprint the serialised form
        let bytes = serde_json::to_vec(data)?;
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        bytes.hash(&mut hasher);

        Ok(Self {
            metric: data.metric,
            size: (style.width, style.height),
            data_hash: hasher.finish(),
        })
    }
}

// Helper function to wrap errors
fn wrap_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Render the dashboard's current chart to its plot path
pub fn generate_plot(app: &App) -> Result<()> {
    if let Some(parent) = app.plot_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = app.current_chart();
    render_chart(&data, &app.plot_path, &app.chart_style, &ChartTheme::default())
}

/// Render `data` to PNG bytes off the async runtime, reusing recent results
pub async fn generate_plot_async(
    data: ChartData,
    style: ChartStyle,
    theme: ChartTheme,
) -> Result<Vec<u8>> {
    let cache_key = PlotCacheKey::new(&data, &style)?;

    // Try to get from cache first
    if let Some(plot_data) = cached_plot(&cache_key).await {
        debug!("plot cache hit for {:?}", cache_key.metric);
        return Ok(plot_data);
    }

    // Generate new plot in blocking task
    let plot_data = tokio::task::spawn_blocking(move || {
        let file = tempfile::Builder::new()
            .prefix("weightstats-")
            .suffix(".png")
            .tempfile()?;
        render_chart(&data, file.path(), &style, &theme)?;
        Ok::<_, Error>(std::fs::read(file.path())?)
    })
    .await??;

    PLOT_CACHE
        .lock()
        .await
        .put(cache_key, (plot_data.clone(), Instant::now()));

    Ok(plot_data)
}

/// Bytes rendered for `key` within the last five minutes, if any
pub(crate) async fn cached_plot(key: &PlotCacheKey) -> Option<Vec<u8>> {
    let mut cache = PLOT_CACHE.lock().await;
    match cache.get(key) {
        Some((plot_data, timestamp)) if timestamp.elapsed() < PLOT_CACHE_TTL => {
            Some(plot_data.clone())
        }
        _ => None,
    }
}

/// Draw `data` as a line chart and write it to `path`.
///
/// The image format follows the file extension. Empty data produces a
/// placeholder image with the metric's "no data" message.
pub fn render_chart(
    data: &ChartData,
    path: &Path,
    style: &ChartStyle,
    theme: &ChartTheme,
) -> Result<()> {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_chart(data, &root, style, theme)?;
    root.present().map_err(wrap_err)?;
    debug!("rendered {:?} chart to {}", data.metric, path.display());
    Ok(())
}

/// Internal function to draw onto an existing area
pub fn draw_chart(
    data: &ChartData,
    root_area: &DrawingArea<BitMapBackend, Shift>,
    style: &ChartStyle,
    theme: &ChartTheme,
) -> Result<()> {
    root_area.fill(&theme.background_color).map_err(wrap_err)?;

    if data.is_empty() {
        return draw_placeholder(root_area, data.metric.empty_message(), style, theme);
    }

    let (x_min, x_max) = x_range(&data.axis);
    let (y_min, y_max) = value_range(data.metric, &data.all_values());

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            data.metric.title(),
            ("sans-serif", style.caption_size).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(wrap_err)?;

    let axis = data.axis.clone();
    let x_label_formatter = move |x: &f64| format_x_label(&axis, *x);
    let metric = data.metric;
    let y_label_formatter = move |y: &f64| format_y_label(metric, *y);

    chart_builder
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_desc("Date")
        .y_desc(data.metric.axis_title())
        .label_style(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .x_labels(x_label_count(&data.axis))
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .draw()
        .map_err(wrap_err)?;

    draw_series(&mut chart_builder, data, style)?;

    chart_builder
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(theme.background_color.mix(0.8))
        .border_style(theme.grid_color)
        .label_font(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .draw()
        .map_err(wrap_err)?;

    Ok(())
}

fn draw_series(chart_builder: &mut Chart, data: &ChartData, style: &ChartStyle) -> Result<()> {
    let legend_width = style.legend_width;

    for series in &data.series {
        let color = series.color.to_rgb_color();
        let points = plot_points(&data.axis, &series.points);
        let line_width = series.style.border_width.round().max(1.0) as u32;
        let radius = series.style.point_radius.round().max(1.0) as i32;

        // Absent points were filtered out, so the line bridges gaps
        chart_builder
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(line_width)))
            .map_err(wrap_err)?
            .label(series.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_width, y)], color.stroke_width(2))
            });

        chart_builder
            .draw_series(points.into_iter().map(|p| Circle::new(p, radius, color.filled())))
            .map_err(wrap_err)?;
    }

    Ok(())
}

fn draw_placeholder(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    message: &str,
    style: &ChartStyle,
    theme: &ChartTheme,
) -> Result<()> {
    let (width, height) = root_area.dim_in_pixel();
    let text_style = ("sans-serif", style.caption_size)
        .into_font()
        .color(&theme.text_color)
        .pos(Pos::new(HPos::Center, VPos::Center));

    root_area
        .draw(&Text::new(
            message.to_string(),
            ((width / 2) as i32, (height / 2) as i32),
            text_style,
        ))
        .map_err(wrap_err)?;
    Ok(())
}

/// Chart coordinates of the plotted points of one series.
///
/// Categorical axes place date `i` at `x = i`; time scales place a point at
/// the number of days since the start of the scale.
pub(crate) fn plot_points(axis: &Axis, points: &SeriesPoints) -> Vec<(f64, f64)> {
    match (axis, points) {
        (_, SeriesPoints::Aligned(values)) => values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect(),
        (Axis::TimeScale(scale), SeriesPoints::Native(points)) => points
            .iter()
            .map(|p| ((p.date - scale.min).num_days() as f64, p.value))
            .collect(),
        (Axis::Categorical(dates), SeriesPoints::Native(points)) => points
            .iter()
            .filter_map(|p| {
                dates
                    .binary_search(&p.date)
                    .ok()
                    .map(|i| (i as f64, p.value))
            })
            .collect(),
    }
}

pub(crate) fn x_range(axis: &Axis) -> (f64, f64) {
    let last = match axis {
        Axis::Categorical(dates) => dates.len().saturating_sub(1) as f64,
        Axis::TimeScale(scale) => scale.span_days() as f64,
    };
    (-0.5, last + 0.5)
}

fn x_label_count(axis: &Axis) -> usize {
    match axis {
        Axis::Categorical(dates) => dates.len().clamp(1, 10),
        Axis::TimeScale(scale) => (scale.span_days() as usize + 1).clamp(1, 10),
    }
}

/// Label for an x coordinate; blank between whole positions.
pub(crate) fn format_x_label(axis: &Axis, x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    let idx = rounded as i64;
    match axis {
        Axis::Categorical(dates) => dates
            .get(idx as usize)
            .map(|d| axis_label(*d))
            .unwrap_or_default(),
        Axis::TimeScale(scale) => {
            if idx > scale.span_days() {
                return String::new();
            }
            (scale.min + ChronoDuration::days(idx))
                .format("%b %-d")
                .to_string()
        }
    }
}

fn format_y_label(metric: Metric, y: f64) -> String {
    match metric {
        Metric::Weight => format!("{:.1}", y),
        Metric::Steps => {
            if y.abs() >= 1_000.0 {
                format!("{:.1}K", y / 1_000.0)
            } else {
                format!("{:.0}", y)
            }
        }
    }
}

/// y range for a metric: weights are padded around the observed values,
/// steps always start at zero.
pub(crate) fn value_range(metric: Metric, values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    match metric {
        Metric::Weight => {
            let pad = ((hi - lo) * 0.1).max(1.0);
            ((lo - pad).max(0.0), hi + pad)
        }
        Metric::Steps => (0.0, (hi * 1.1).max(1.0)),
    }
}
