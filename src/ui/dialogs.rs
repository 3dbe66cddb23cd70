// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal windows: frame capture, baseline comparison, alerts and the busy overlay.

use crate::measure::baseline::{compare_frames, format_percentage};
use crate::models::FrameDetails;

/// Inputs of the capture dialog.
#[derive(Default)]
pub struct CaptureForm {
    pub open: bool,
    pub timestamp: f64,
    pub frame_idx: u64,
}

/// Inputs and fetched frames of the comparison dialog.
#[derive(Default)]
pub struct CompareForm {
    pub open: bool,
    pub current_id: String,
    pub baseline_id: String,
    pub frames: Option<(FrameDetails, FrameDetails)>,
}

/// Show the capture dialog. Returns `(timestamp, frame_idx)` when confirmed.
pub fn capture(ctx: &egui::Context, form: &mut CaptureForm) -> Option<(f64, u64)> {
    let mut confirmed = None;
    let mut open = form.open;
    egui::Window::new("Capture Frame")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("capture_form").num_columns(2).show(ui, |ui| {
                ui.label("Timestamp (s):");
                ui.add(
                    egui::DragValue::new(&mut form.timestamp)
                        .speed(0.01)
                        .range(0.0..=f64::MAX),
                );
                ui.end_row();
                ui.label("Frame index:");
                ui.add(egui::DragValue::new(&mut form.frame_idx));
                ui.end_row();
            });
            if ui.button("Capture").clicked() {
                confirmed = Some((form.timestamp, form.frame_idx));
            }
        });
    form.open = open && confirmed.is_none();
    confirmed
}

/// Show the comparison dialog. Returns the two frame ids when a fetch is requested.
pub fn compare(ctx: &egui::Context, form: &mut CompareForm) -> Option<(String, String)> {
    let mut requested = None;
    let mut open = form.open;
    egui::Window::new("Compare With Baseline")
        .open(&mut open)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("compare_form").num_columns(2).show(ui, |ui| {
                ui.label("Frame id:");
                ui.text_edit_singleline(&mut form.current_id);
                ui.end_row();
                ui.label("Baseline frame id:");
                ui.text_edit_singleline(&mut form.baseline_id);
                ui.end_row();
            });
            let ready = !form.current_id.trim().is_empty() && !form.baseline_id.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("Compare")).clicked() {
                requested = Some((
                    form.current_id.trim().to_string(),
                    form.baseline_id.trim().to_string(),
                ));
            }

            if let Some((current, baseline)) = &form.frames {
                ui.separator();
                ui.label(format!(
                    "Frame {} vs baseline frame {}",
                    current.frame_idx, baseline.frame_idx
                ));
                egui::Grid::new("comparison_table")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Value");
                        ui.strong("% of baseline");
                        ui.strong("% change");
                        ui.end_row();
                        for (name, comparison) in compare_frames(current, baseline) {
                            ui.label(name);
                            match comparison {
                                Some(c) => {
                                    ui.monospace(format_percentage(c.percent_of_baseline));
                                    ui.monospace(format_percentage(c.percent_change));
                                }
                                None => {
                                    ui.weak("-");
                                    ui.weak("-");
                                }
                            }
                            ui.end_row();
                        }
                    });
            }
        });
    form.open = open;
    requested
}

/// Show a modal alert. Returns `false` once dismissed.
pub fn alert(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut keep = true;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                keep = false;
            }
        });
    keep
}

/// Dim the window and show a spinner with `message`, blocking input below it.
pub fn busy_overlay(ctx: &egui::Context, message: &str) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("busy_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            // Swallow clicks so nothing underneath reacts
            ui.allocate_rect(screen, egui::Sense::click_and_drag());
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(150));
            ui.allocate_ui_at_rect(screen, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(screen.height() / 2.0 - 30.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(220)),
                        );
                    });
                });
            });
        });
}
