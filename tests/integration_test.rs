use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use weightstats::analysis::{aggregate, load_snapshot, load_snapshot_async};
use weightstats::app::App;
use weightstats::types::{Axis, Metric, SeriesPoints};
use weightstats::Error;

const SNAPSHOT: &str = r#"{
    "group": {
        "id": "6f1c",
        "title": "Spring Challenge",
        "description": null,
        "created_by": "u-alice"
    },
    "member_ids": ["u-alice", "u-bob", "u-carol"],
    "profiles": [
        {"id": "u-alice", "full_name": "Alice", "height": 168.0, "weight": 82.0, "avatar_url": null},
        {"id": "u-bob", "full_name": "Bob"}
    ],
    "logs": [
        {"id": "1", "user_id": "u-alice", "status": 82.0, "steps": 6500, "log_date": "2024-03-01", "created_at": "2024-03-01T20:11:00+00:00"},
        {"id": "2", "user_id": "u-bob", "weight": 95.5, "steps": 0, "log_date": "2024-03-02", "created_at": "2024-03-02T07:00:00+00:00"},
        {"id": "3", "user_id": "u-alice", "status": 81.1, "steps": 9100, "log_date": "2024-03-04", "created_at": "2024-03-04T19:40:00+00:00"},
        {"id": "4", "user_id": "u-carol", "weight": 70.2, "steps": 12000, "created_at": "2024-03-03T12:00:00Z"},
        {"id": "5", "user_id": "u-bob", "weight": 94.9, "steps": null, "log_date": null, "created_at": null}
    ]
}"#;

fn write_snapshot(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("group.json");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

#[test]
fn test_full_workflow() {
    let (_temp_dir, path) = write_snapshot(SNAPSHOT);
    let snapshot = load_snapshot(&path).unwrap();

    assert_eq!(snapshot.member_count(), 3);
    assert_eq!(snapshot.logs.len(), 5);

    // Weight: shared daily axis with gaps
    let weight = aggregate(&snapshot.logs, &snapshot.profiles, Metric::Weight);
    match &weight.axis {
        Axis::Categorical(dates) => assert_eq!(dates.len(), 4),
        other => panic!("expected categorical axis, got {:?}", other),
    }
    let labels: Vec<&str> = weight.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Alice", "Bob", "User 3"]);
    assert_eq!(
        weight.series[0].points,
        SeriesPoints::Aligned(vec![Some(82.0), None, None, Some(81.1)])
    );
    assert_eq!(
        weight.series[1].points,
        SeriesPoints::Aligned(vec![None, Some(95.5), None, None])
    );

    // Steps: Bob only logged zero steps and drops out
    let steps = aggregate(&snapshot.logs, &snapshot.profiles, Metric::Steps);
    assert!(matches!(steps.axis, Axis::TimeScale(_)));
    let labels: Vec<&str> = steps.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Alice", "User 2"]);
    assert_eq!(steps.all_values(), vec![6500.0, 9100.0, 12000.0]);
}

#[test]
fn test_app_workflow() {
    let (_temp_dir, path) = write_snapshot(SNAPSHOT);

    let mut app = App::default();
    app.data_path = path.display().to_string();
    app.update_with_snapshot(load_snapshot(&path).unwrap());

    assert_eq!(app.refresh_chart().series.len(), 3);
    app.set_metric(Metric::Steps);
    assert_eq!(app.refresh_chart().series.len(), 2);
    assert_eq!(app.chart_cache.len(), 2);

    assert!(!app.can_delete_group());
    assert_eq!(app.logs_for("u-bob").len(), 2);
    assert_eq!(app.members_page().items.len(), 2);
}

#[tokio::test]
async fn test_async_load() {
    let (_temp_dir, path) = write_snapshot(SNAPSHOT);

    let mut app = App::default();
    app.data_path = path.display().to_string();
    let snapshot = app.load_snapshot().await.unwrap();
    assert_eq!(snapshot.profiles.len(), 2);

    let direct = load_snapshot_async(path).await.unwrap();
    assert_eq!(direct, snapshot);
}

#[tokio::test]
async fn test_error_handling() {
    // Missing file
    let result = load_snapshot_async(PathBuf::from("/nonexistent/group.json")).await;
    assert!(matches!(result, Err(Error::Io(_))));

    // Malformed JSON names the file
    let (_temp_dir, path) = write_snapshot("{ \"logs\": [ {\"id\": 1 } ] }");
    match load_snapshot(&path) {
        Err(Error::Snapshot { path: bad, .. }) => assert_eq!(bad, path),
        other => panic!("expected snapshot error, got {:?}", other),
    }
}

#[test]
fn test_empty_snapshot() {
    let (_temp_dir, path) = write_snapshot("{}");
    let snapshot = load_snapshot(&path).unwrap();

    for metric in Metric::ALL {
        let chart = aggregate(&snapshot.logs, &snapshot.profiles, metric);
        assert!(chart.is_empty());
    }
    assert_eq!(snapshot.member_count(), 0);
}
