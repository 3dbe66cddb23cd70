// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurements panel.
//!
//! This module provides the side panel listing the frame's measurements,
//! the frame naming options and the save action.

use crate::models::{FrameContext, MeasurementKey, Measurements};

/// Result of measurements panel interaction.
pub enum PropertiesAction {
    None,
    Save,
    Retry,
    ClearAll,
}

/// Display the measurements panel.
pub fn show(
    ui: &mut egui::Ui,
    frame: &mut Option<FrameContext>,
    measurements: &Measurements,
    last_error: Option<&str>,
    busy: bool,
    saving: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Measurements");
    ui.separator();

    let Some(frame) = frame else {
        ui.label("No frame loaded");
        return action;
    };

    ui.label(egui::RichText::new(frame.title()).strong());
    ui.add_space(4.0);

    egui::Grid::new("measurement_table")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for key in MeasurementKey::ALL {
                ui.label(key.label());
                match measurements.get(key) {
                    Some(value) => ui.monospace(format!("{:.2}{}", value, key.unit())),
                    None => ui.weak("-"),
                };
                ui.end_row();
            }

            if let Some(ratio) = &measurements.distance_ratio {
                ui.label("Distance Ratio");
                ui.monospace(format!("{:.1}%", ratio.ratio_percentage));
                ui.end_row();
                ui.label("  Horizontal");
                ui.monospace(format!("{:.2} px", ratio.horizontal_distance));
                ui.end_row();
                ui.label("  Vertical");
                ui.monospace(format!("{:.2} px", ratio.vertical_distance));
                ui.end_row();
            }
        });

    if let Some(error) = last_error {
        ui.add_space(8.0);
        ui.colored_label(egui::Color32::LIGHT_RED, format!("Calculation failed: {}", error));
        if ui.add_enabled(!busy, egui::Button::new("Retry")).clicked() {
            action = PropertiesAction::Retry;
        }
    }

    ui.add_space(12.0);
    ui.separator();
    ui.label("Save options");

    let mut name = frame.custom_name.clone().unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("Name:");
        if ui.text_edit_singleline(&mut name).changed() {
            let trimmed = name.trim();
            frame.custom_name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
    });
    ui.checkbox(&mut frame.override_existing, "Replace existing frame");

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let label = if saving { "Saving..." } else { "💾 Save Frame" };
        if ui
            .add_enabled(!busy && !saving, egui::Button::new(label))
            .clicked()
        {
            action = PropertiesAction::Save;
        }
        if ui.add_enabled(!busy, egui::Button::new("Clear All")).clicked() {
            action = PropertiesAction::ClearAll;
        }
    });

    action
}
