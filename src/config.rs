//! Runtime configuration read from `WEIGHTSTATS_*` environment variables.

use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Snapshot file loaded on startup, if any
    pub data_path: Option<PathBuf>,
    /// Directory rendered charts are written to
    pub plot_dir: PathBuf,
    pub plot_width: u32,
    pub plot_height: u32,
    pub members_per_page: usize,
    /// Origin used when building invite links
    pub invite_origin: String,
    /// Profile id of the person viewing the dashboard
    pub viewer_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            plot_dir: default_plot_dir(),
            plot_width: 800,
            plot_height: 480,
            members_per_page: 10,
            invite_origin: "http://localhost:3000".to_string(),
            viewer_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_path: get("WEIGHTSTATS_DATA").map(PathBuf::from),
            plot_dir: get("WEIGHTSTATS_PLOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.plot_dir),
            plot_width: parse_or(&get, "WEIGHTSTATS_PLOT_WIDTH", defaults.plot_width),
            plot_height: parse_or(&get, "WEIGHTSTATS_PLOT_HEIGHT", defaults.plot_height),
            members_per_page: parse_or(
                &get,
                "WEIGHTSTATS_MEMBERS_PER_PAGE",
                defaults.members_per_page,
            )
            .max(1),
            invite_origin: get("WEIGHTSTATS_INVITE_ORIGIN").unwrap_or(defaults.invite_origin),
            viewer_id: get("WEIGHTSTATS_USER").map(|v| v.trim().to_string()),
        }
    }

    pub fn plot_path(&self) -> PathBuf {
        self.plot_dir.join("group_progress.png")
    }

    pub fn plot_size(&self) -> (u32, u32) {
        (self.plot_width, self.plot_height)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} must be a number, got {:?}; using default", key, raw);
            default
        }),
        None => default,
    }
}

fn default_plot_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("weightstats")
}
