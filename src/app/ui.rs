use egui::{Color32, Context, RichText};
use image::ImageReader;
use log::{error, warn};
use std::sync::{Arc, Mutex};

use super::App;
use crate::error::Result;
use crate::types::{Metric, Profile};

const ERROR_COLOR: Color32 = Color32::from_rgb(244, 63, 94);

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Group Data");
        ui.separator();

        ui.label("Snapshot file:");
        ui.text_edit_singleline(&mut app.data_path);

        if ui.button("Load").clicked() && !app.is_loading {
            start_loading(app, ctx, app_arc.clone());
        }
        if app.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }

        ui.separator();
        ui.label("Chart:");
        ui.horizontal(|ui| {
            for metric in Metric::ALL {
                if ui
                    .selectable_label(app.current_metric == metric, metric.label())
                    .clicked()
                {
                    app.set_metric(metric);
                }
            }
        });

        ui.separator();
        draw_group_details(app, ui);

        if let Some(message) = &app.error_message {
            ui.separator();
            ui.colored_label(ERROR_COLOR, message);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(app.current_metric.title());
            ui.separator();

            match &app.plot_texture {
                Some(texture) => {
                    ui.image(texture);
                }
                None => {
                    ui.label(RichText::new(app.current_metric.empty_message()).size(16.0));
                }
            }

            ui.separator();
            ui.heading("Group Members");
            draw_members(app, ui);

            if let Some(user_id) = app.selected_member.clone() {
                ui.separator();
                ui.heading(format!("Logs for {}", app.member_name(&user_id)));
                draw_logs(app, ui, &user_id);
            }
        });
    });

    // Update plot if needed
    if app.update_needed {
        refresh_plot(app, ctx);
        app.update_needed = false;
    }
}

fn start_loading(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    app.is_loading = true;
    app.error_message = None;
    let future = app.load_snapshot();
    let ctx = ctx.clone();

    tokio::spawn(async move {
        let result = future.await;
        match app_arc.lock() {
            Ok(mut app) => {
                match result {
                    Ok(snapshot) => app.update_with_snapshot(snapshot),
                    Err(e) => {
                        error!("Error loading snapshot: {}", e);
                        app.error_message = Some(e.to_string());
                    }
                }
                app.is_loading = false;
            }
            Err(_) => error!("Failed to acquire app lock after loading"),
        }
        ctx.request_repaint();
    });
}

fn draw_group_details(app: &mut App, ui: &mut egui::Ui) {
    let Some(group) = app.snapshot.group.clone() else {
        ui.label("No group loaded.");
        return;
    };

    ui.heading(&group.title);
    ui.label(group.description_or_default());

    let count = app.snapshot.member_count();
    ui.label(format!(
        "{} member{}",
        count,
        if count == 1 { "" } else { "s" }
    ));

    if let Some(link) = app.invite_link() {
        if ui.button("Copy Invite Link").clicked() {
            ui.output_mut(|o| o.copied_text = link);
            app.status_message = Some("Invite link copied to clipboard!".to_string());
        }
        ui.small("Share this link for one-click joining");
    }
    if let Some(status) = &app.status_message {
        ui.label(status);
    }

    if let Some(notice) = app.delete_notice() {
        ui.small(notice);
    }
}

fn draw_members(app: &mut App, ui: &mut egui::Ui) {
    let page = app.members_page();
    let members: Vec<Profile> = page.items.to_vec();
    let page_label = page.label();
    let (has_previous, has_next, multi_page) =
        (page.has_previous(), page.has_next(), page.total_pages > 1);

    if members.is_empty() {
        ui.label("No members yet.");
        return;
    }

    // Series colours follow first appearance in the chart
    let chart = app.current_chart();

    egui::Grid::new("members_grid")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            ui.strong("");
            ui.strong("Member");
            ui.strong("");
            ui.end_row();

            for member in &members {
                let swatch = chart
                    .series
                    .iter()
                    .find(|s| s.user_id == member.id)
                    .map(|s| {
                        let (r, g, b) = s.color.rgb();
                        Color32::from_rgb(r, g, b)
                    })
                    .unwrap_or(Color32::GRAY);
                ui.colored_label(swatch, RichText::new(member.initial()).strong());
                ui.label(&member.full_name);

                let selected = app.selected_member.as_deref() == Some(member.id.as_str());
                if ui.selectable_label(selected, "Logs").clicked() {
                    app.selected_member = if selected {
                        None
                    } else {
                        Some(member.id.clone())
                    };
                }
                ui.end_row();
            }
        });

    if multi_page {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_previous, egui::Button::new("Previous"))
                .clicked()
            {
                app.previous_page();
            }
            ui.label(page_label);
            if ui.add_enabled(has_next, egui::Button::new("Next")).clicked() {
                app.next_page();
            }
        });
    }
}

fn draw_logs(app: &App, ui: &mut egui::Ui, user_id: &str) {
    let logs = app.logs_for(user_id);
    if logs.is_empty() {
        ui.label("No weight logs found. Start tracking your weight!");
        return;
    }

    egui::Grid::new("logs_grid")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            ui.strong("Date");
            ui.strong(format!("Weight ({})", Metric::Weight.unit()));
            ui.strong("Steps");
            ui.end_row();

            for log in logs {
                let date = log
                    .date()
                    .map(|d| Metric::Weight.format_tooltip_date(d))
                    .unwrap_or_else(|| "Unknown".to_string());
                ui.label(date);
                ui.label(
                    log.weight
                        .map(|w| format!("{:.1}", w))
                        .unwrap_or_else(|| "-".to_string()),
                );
                ui.label(
                    log.value(Metric::Steps)
                        .map(|s| Metric::Steps.format_value(s))
                        .unwrap_or_else(|| "-".to_string()),
                );
                ui.end_row();
            }
        });
}

fn refresh_plot(app: &mut App, ctx: &Context) {
    let chart = app.refresh_chart();
    if chart.is_empty() {
        app.plot_texture = None;
        return;
    }

    if let Err(e) = crate::plotting::generate_plot(app) {
        error!("Plotting error: {}", e);
        app.error_message = Some(e.to_string());
        app.plot_texture = None;
    } else if let Err(e) = load_plot_texture(app, ctx) {
        warn!("Failed to load plot image: {}", e);
        app.plot_texture = None;
    }
}

fn load_plot_texture(app: &mut App, ctx: &Context) -> Result<()> {
    let image = ImageReader::open(&app.plot_path)?.decode()?;
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.to_rgba8();
    let pixels = pixels.as_flat_samples();
    let texture = ctx.load_texture(
        "plot_texture",
        egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
        egui::TextureOptions::LINEAR,
    );
    app.plot_texture = Some(texture);
    Ok(())
}
