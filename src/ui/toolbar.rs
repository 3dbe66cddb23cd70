// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! One selectable button per measurement subtype, grouped by family. The
//! highlight comes from the selection derived from history, never from
//! local widget state.

use crate::measure::{RatioStep, ToolSelection};
use crate::models::{ActiveTool, AngleKind, AreaKind, DistanceKind};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    Toggle(ActiveTool),
    FinishArea,
    Undo,
    Redo,
}

/// Display the toolbar with tool selection buttons.
pub fn show(
    ui: &mut egui::Ui,
    selection: ToolSelection,
    busy: bool,
    can_undo: bool,
    can_redo: bool,
    can_finish_area: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.add_enabled_ui(!busy, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 8.0;

            ui.label("Angles:");
            for kind in AngleKind::ALL {
                tool_button(ui, selection, ActiveTool::Angle(kind), &mut action);
            }

            ui.separator();
            ui.label("Areas:");
            for kind in AreaKind::ALL {
                tool_button(ui, selection, ActiveTool::Area(kind), &mut action);
            }
            if ui
                .add_enabled(can_finish_area, egui::Button::new("✔ Finish Area"))
                .on_hover_text("Close the polygon (Enter)")
                .clicked()
            {
                action = ToolbarAction::FinishArea;
            }

            ui.separator();
            ui.label("Distances:");
            for kind in DistanceKind::ALL {
                tool_button(ui, selection, ActiveTool::RawDistance(kind), &mut action);
            }
            tool_button(ui, selection, ActiveTool::DistanceRatio, &mut action);

            ui.separator();
            if ui
                .add_enabled(can_undo, egui::Button::new("⟲ Undo"))
                .on_hover_text("Ctrl+Z")
                .clicked()
            {
                action = ToolbarAction::Undo;
            }
            if ui
                .add_enabled(can_redo, egui::Button::new("⟳ Redo"))
                .on_hover_text("Ctrl+Shift+Z")
                .clicked()
            {
                action = ToolbarAction::Redo;
            }
        });
    });

    if let Some(step) = selection.ratio_step() {
        let text = match step {
            RatioStep::Horizontal => "Place the two horizontal points",
            RatioStep::Vertical => "Place the two vertical points",
        };
        ui.label(egui::RichText::new(text).italics().weak());
    }

    action
}

fn tool_button(
    ui: &mut egui::Ui,
    selection: ToolSelection,
    tool: ActiveTool,
    action: &mut ToolbarAction,
) {
    let label = match tool {
        ActiveTool::Angle(kind) => kind.key().label().trim_start_matches("Angle "),
        ActiveTool::Area(kind) => kind.key().label().trim_start_matches("Area "),
        ActiveTool::RawDistance(kind) => kind.key().label().trim_start_matches("Distance "),
        ActiveTool::DistanceRatio => "Ratio",
    };
    if ui
        .selectable_label(selection.is_selected(tool), label)
        .on_hover_text(tool.label())
        .clicked()
    {
        *action = ToolbarAction::Toggle(tool);
    }
}
