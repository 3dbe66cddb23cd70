// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and point capture.
//!
//! The frame image is drawn at its native size inside a scroll area so that
//! image-local coordinates are pixel coordinates of the frame.

use crate::models::{ActiveTool, AnnotationState, Point};
use crate::util::geometry::{to_screen_space, ImageRect};

const POINT_RADIUS: f32 = 4.0;
const HORIZONTAL_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 200, 255);
const VERTICAL_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 140, 0);

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Primary click at a screen position over the rendered image.
    Click { x: f64, y: f64, rect: ImageRect },
}

/// Display the frame and the points collected so far.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    state: &AnnotationState,
    status: &str,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_height = ui.available_height() - 28.0;

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let (Some(texture), Some((width, height))) = (image_texture, image_size) else {
            ui.set_min_size(egui::vec2(ui.available_width(), available_height));
            show_welcome(ui);
            return;
        };

        egui::ScrollArea::both()
            .max_height(available_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let size = egui::vec2(width as f32, height as f32);
                let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                let rect = ImageRect::new(
                    image_rect.min.x as f64,
                    image_rect.min.y as f64,
                    image_rect.width() as f64,
                    image_rect.height() as f64,
                );

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        action = CanvasAction::Click {
                            x: pos.x as f64,
                            y: pos.y as f64,
                            rect,
                        };
                    }
                }

                let painter = ui.painter_at(image_rect);
                draw_points(&painter, state, &rect);
            });
    });

    // Status chip
    ui.horizontal(|ui| {
        if status.is_empty() {
            ui.label(egui::RichText::new("Select a measurement tool").weak());
        } else {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(30, 80, 140))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(8.0, 2.0))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(status).color(egui::Color32::WHITE));
                });
        }
    });

    action
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Frame Measure")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open or capture a frame to begin measuring")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Frame Image... or File → Capture Frame...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

fn screen_pos(point: &Point, rect: &ImageRect) -> egui::Pos2 {
    let (x, y) = to_screen_space(point, rect);
    egui::pos2(x as f32, y as f32)
}

/// Draw the in-progress points with guide lines for the active tool.
fn draw_points(painter: &egui::Painter, state: &AnnotationState, rect: &ImageRect) {
    let points: Vec<egui::Pos2> = state
        .current_points
        .iter()
        .map(|p| screen_pos(p, rect))
        .collect();
    if points.is_empty() {
        return;
    }

    let stroke = egui::Stroke::new(2.0, egui::Color32::YELLOW);
    match state.active_tool {
        Some(ActiveTool::Area(_)) => {
            for pair in points.windows(2) {
                painter.line_segment([pair[0], pair[1]], stroke);
            }
            // Preview the closing edge once the polygon can be finished
            if points.len() >= crate::models::annotation::MIN_AREA_POINTS {
                let closing = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(120));
                painter.line_segment([points[points.len() - 1], points[0]], closing);
            }
        }
        Some(ActiveTool::DistanceRatio) => {
            let (horizontal, vertical) = points.split_at(points.len().min(2));
            if let [a, b] = horizontal {
                painter.line_segment([*a, *b], egui::Stroke::new(2.0, HORIZONTAL_COLOR));
            }
            if let [a, b] = vertical {
                painter.line_segment([*a, *b], egui::Stroke::new(2.0, VERTICAL_COLOR));
            }
        }
        // Angles are drawn as two rays from the middle point
        Some(ActiveTool::Angle(_)) | Some(ActiveTool::RawDistance(_)) | None => {
            for pair in points.windows(2) {
                painter.line_segment([pair[0], pair[1]], stroke);
            }
        }
    }

    for (i, point) in points.iter().enumerate() {
        let color = match state.active_tool {
            Some(ActiveTool::DistanceRatio) if i < 2 => HORIZONTAL_COLOR,
            Some(ActiveTool::DistanceRatio) => VERTICAL_COLOR,
            _ => egui::Color32::WHITE,
        };
        painter.circle_filled(*point, POINT_RADIUS, color);
        painter.circle_stroke(*point, POINT_RADIUS, egui::Stroke::new(1.0, egui::Color32::BLACK));
    }
}
