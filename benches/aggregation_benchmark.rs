/// Benchmarks for chart aggregation, snapshot loading and chart rendering.
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::fs;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use weightstats::analysis::{aggregate, load_snapshot_async};
use weightstats::plotting::{generate_plot_async, render_chart, ChartStyle, ChartTheme};
use weightstats::types::{GroupSnapshot, MeasurementRecord, Metric, Profile, SeriesPoints};

/// A group of `members` people logging once a day for `days` days,
/// with every fifth day skipped per member.
fn build_snapshot(members: usize, days: i64) -> GroupSnapshot {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let profiles = (0..members)
        .map(|m| Profile {
            id: format!("member-{}", m),
            full_name: format!("Member {}", m),
            avatar_url: None,
            height: Some(170.0),
            weight: None,
        })
        .collect();

    let mut logs = Vec::new();
    for day in 0..days {
        for m in 0..members {
            if (day + m as i64) % 5 == 0 {
                continue;
            }
            let date = start + Duration::days(day);
            logs.push(MeasurementRecord {
                id: format!("{}-{}", m, day),
                user_id: format!("member-{}", m),
                weight: Some(90.0 - day as f64 * 0.05 + m as f64),
                steps: Some(((day * 37 + m as i64 * 11) % 12) * 1000),
                log_date: Some(date.to_string()),
                created_at: Some(format!("{}T08:30:00+00:00", date)),
            });
        }
    }

    GroupSnapshot {
        group: None,
        member_ids: Vec::new(),
        profiles,
        logs,
    }
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let snapshot = build_snapshot(25, 365);

    for metric in Metric::ALL {
        group.bench_function(format!("aggregate_{}", metric.label().to_lowercase()), |b| {
            b.iter(|| {
                aggregate(
                    black_box(&snapshot.logs),
                    black_box(&snapshot.profiles),
                    metric,
                )
            })
        });
    }

    group.finish();
}

fn bench_snapshot_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let rt = Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("group.json");
    fs::write(&path, serde_json::to_vec(&build_snapshot(25, 365)).unwrap()).unwrap();

    group.bench_function("load_snapshot_async", |b| {
        b.iter(|| rt.block_on(load_snapshot_async(path.clone())).unwrap())
    });

    group.finish();
}

fn bench_plotting(c: &mut Criterion) {
    let mut group = c.benchmark_group("plotting");
    group.sample_size(20);
    let rt = Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(10, 90);

    for metric in Metric::ALL {
        let chart = aggregate(&snapshot.logs, &snapshot.profiles, metric);
        let name = metric.label().to_lowercase();

        let path = temp_dir.path().join(format!("{}.png", name));
        group.bench_function(format!("render_{}", name), |b| {
            b.iter(|| {
                render_chart(
                    black_box(&chart),
                    &path,
                    &ChartStyle::default(),
                    &ChartTheme::default(),
                )
                .unwrap()
            })
        });

        // A fresh value per iteration keeps every call out of the plot cache
        let mut nudge = 0.0;
        group.bench_function(format!("generate_plot_async_cold_{}", name), |b| {
            b.iter_batched(
                || {
                    nudge += 0.001;
                    let mut chart = chart.clone();
                    match &mut chart.series[0].points {
                        SeriesPoints::Aligned(values) => {
                            if let Some(v) = values.iter_mut().flatten().next() {
                                *v += nudge;
                            }
                        }
                        SeriesPoints::Native(points) => points[0].value += nudge,
                    }
                    chart
                },
                |chart| {
                    rt.block_on(generate_plot_async(
                        chart,
                        ChartStyle::default(),
                        ChartTheme::default(),
                    ))
                    .unwrap()
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("generate_plot_async_warm_{}", name), |b| {
            b.iter(|| {
                rt.block_on(generate_plot_async(
                    chart.clone(),
                    ChartStyle::default(),
                    ChartTheme::default(),
                ))
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_aggregation,
    bench_snapshot_loading,
    bench_plotting
);
criterion_main!(benches);
