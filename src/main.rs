//! Group Weight Tracking Dashboard
//!
//! A GUI application for comparing the weight and step progress of a group.

use anyhow::{anyhow, Result};
use eframe::egui;
use log::{error, info};
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use weightstats::analysis::load_snapshot;
use weightstats::app::{App, AppWrapper};
use weightstats::Config;

#[cfg(feature = "dev")]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(feature = "dev"))]
const DEFAULT_LOG_LEVEL: &str = "info";

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::from_env();
    let mut app = App::from_config(&config);

    if let Some(path) = &config.data_path {
        match load_snapshot(path) {
            Ok(snapshot) => app.update_with_snapshot(snapshot),
            Err(e) => {
                error!("Error loading {}: {}", path.display(), e);
                app.error_message = Some(e.to_string());
            }
        }
    }
    info!("writing charts to {}", config.plot_dir.display());

    // Initialize the Tokio runtime
    let rt = Runtime::new()?;
    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Group Progress"),
            ..Default::default()
        };

        eframe::run_native(
            "Group Progress",
            options,
            Box::new(move |cc| {
                let fonts = egui::FontDefinitions::default();
                cc.egui_ctx.set_fonts(fonts);

                let app: Arc<Mutex<App>> = Arc::new(Mutex::new(app));
                Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
            }),
        )
        .map_err(|e| anyhow!("Error running application: {}", e))
    })
}
