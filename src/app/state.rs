use eframe::App as EApp;
use egui::TextureHandle;
use log::{error, info};
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::analysis::{aggregate, load_snapshot_async, ChartCache};
use crate::config::Config;
use crate::error::Result;
use crate::plotting::ChartStyle;
use crate::types::{CacheKey, ChartData, GroupSnapshot, MeasurementRecord, Metric, Profile};
use crate::utils::{paginate, Page};

/// Main application state
#[derive(Clone)]
pub struct App {
    pub data_path: String,
    pub snapshot: GroupSnapshot,
    pub current_metric: Metric,
    pub plot_path: PathBuf,
    pub plot_texture: Option<TextureHandle>,
    pub chart_style: ChartStyle,
    pub chart_cache: ChartCache,
    pub invite_origin: String,
    pub viewer_id: Option<String>,
    pub members_per_page: usize,
    pub member_page: usize,
    pub selected_member: Option<String>,
    pub update_needed: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
}

impl App {
    pub fn from_config(config: &Config) -> Self {
        let (width, height) = config.plot_size();
        Self {
            data_path: config
                .data_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            plot_path: config.plot_path(),
            chart_style: ChartStyle::with_size(width, height),
            invite_origin: config.invite_origin.clone(),
            viewer_id: config.viewer_id.clone(),
            members_per_page: config.members_per_page,
            ..Self::default()
        }
    }

    /// Replace the loaded data; every derived chart is rebuilt on next use
    pub fn update_with_snapshot(&mut self, snapshot: GroupSnapshot) {
        info!(
            "showing group {:?} with {} members and {} logs",
            snapshot.group.as_ref().map(|g| g.title.as_str()).unwrap_or("(none)"),
            snapshot.member_count(),
            snapshot.logs.len()
        );

        let keep_selection = self
            .selected_member
            .as_ref()
            .map(|id| snapshot.profiles.iter().any(|p| &p.id == id))
            .unwrap_or(false);
        if !keep_selection {
            self.selected_member = None;
        }

        self.snapshot = snapshot;
        self.chart_cache.clear();
        self.member_page = 1;
        self.error_message = None;
        self.status_message = None;
        self.update_needed = true;
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if self.current_metric != metric {
            self.current_metric = metric;
            self.update_needed = true;
        }
    }

    fn cache_key(&self, metric: Metric) -> CacheKey {
        CacheKey {
            group_id: self.snapshot.group_id().to_string(),
            metric,
        }
    }

    /// Chart for the selected metric, from the cache when available
    pub fn current_chart(&self) -> ChartData {
        self.chart_cache
            .get(&self.cache_key(self.current_metric))
            .cloned()
            .unwrap_or_else(|| {
                aggregate(
                    &self.snapshot.logs,
                    &self.snapshot.profiles,
                    self.current_metric,
                )
            })
    }

    /// Recompute the chart for the selected metric and cache it
    pub fn refresh_chart(&mut self) -> ChartData {
        let key = self.cache_key(self.current_metric);
        if let Some(chart) = self.chart_cache.get(&key) {
            return chart.clone();
        }
        let chart = aggregate(
            &self.snapshot.logs,
            &self.snapshot.profiles,
            self.current_metric,
        );
        self.chart_cache.store(key, chart.clone());
        chart
    }

    pub fn members_page(&self) -> Page<'_, Profile> {
        paginate(
            &self.snapshot.profiles,
            self.member_page,
            self.members_per_page,
        )
    }

    pub fn next_page(&mut self) {
        let total = self.members_page().total_pages;
        self.member_page = (self.member_page + 1).min(total);
    }

    pub fn previous_page(&mut self) {
        self.member_page = self.member_page.saturating_sub(1).max(1);
    }

    /// A member's logs, newest first; undated rows go last
    pub fn logs_for(&self, user_id: &str) -> Vec<&MeasurementRecord> {
        let mut logs: Vec<&MeasurementRecord> = self
            .snapshot
            .logs
            .iter()
            .filter(|log| log.user_id == user_id)
            .collect();
        logs.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        logs
    }

    pub fn member_name(&self, user_id: &str) -> String {
        self.snapshot
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .map(|p| p.full_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }

    pub fn invite_link(&self) -> Option<String> {
        self.snapshot
            .group
            .as_ref()
            .map(|g| g.join_link(&self.invite_origin))
    }

    pub fn can_delete_group(&self) -> bool {
        self.snapshot
            .group
            .as_ref()
            .map(|g| g.can_delete(self.snapshot.member_count()))
            .unwrap_or(false)
    }

    /// Whether the viewer created the loaded group
    pub fn is_owner(&self) -> bool {
        match (&self.snapshot.group, &self.viewer_id) {
            (Some(group), Some(viewer)) => group.is_owner(viewer),
            _ => false,
        }
    }

    /// Deletion state shown to the group owner; `None` for everyone else
    pub fn delete_notice(&self) -> Option<&'static str> {
        if !self.is_owner() {
            return None;
        }
        Some(if self.can_delete_group() {
            "You are the only member; this group can be deleted"
        } else {
            "Cannot delete group with active members"
        })
    }

    /// Start loading the snapshot at `data_path`
    pub fn load_snapshot(&self) -> impl Future<Output = Result<GroupSnapshot>> {
        load_snapshot_async(PathBuf::from(self.data_path.trim()))
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            data_path: String::new(),
            snapshot: GroupSnapshot::default(),
            current_metric: Metric::Weight,
            plot_path: std::env::temp_dir().join("group_progress.png"),
            plot_texture: None,
            chart_style: ChartStyle::default(),
            chart_cache: ChartCache::new(),
            invite_origin: "http://localhost:3000".to_string(),
            viewer_id: None,
            members_per_page: 10,
            member_page: 1,
            selected_member: None,
            update_needed: false,
            is_loading: false,
            error_message: None,
            status_message: None,
        }
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            error!("Failed to acquire app lock in update");
        }
    }
}
