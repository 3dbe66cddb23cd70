// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the measurement session of the open frame
//! and runs backend calls on worker threads, polling their results once per
//! frame.

use crate::client::{backend_unavailable_message, BackendClient};
use crate::config::AppConfig;
use crate::io::media::DecodedImage;
use crate::measure::keys::shortcut;
use crate::measure::{
    ApplyOutcome, CalculationResult, ClickOutcome, MeasurementSession, PendingCalculation,
    RequestTicket, Shortcut, ToolSelection,
};
use crate::models::{
    ActiveTool, FrameContext, FrameDetails, FrameExport, FrameSource, Measurements,
};
use crate::ui::{canvas, dialogs, properties, toolbar};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result reported by a background worker.
enum WorkerEvent {
    Calculated {
        ticket: RequestTicket,
        result: Result<CalculationResult, String>,
    },
    FrameLoaded(Result<LoadedFrame, String>),
    Saved(Result<(), String>),
    Health(bool),
    Compared(Result<(FrameDetails, FrameDetails), String>),
}

/// A decoded frame ready to become a texture.
struct LoadedFrame {
    frame: FrameContext,
    image: DecodedImage,
}

/// Main application state.
pub struct MeasureApp {
    config: AppConfig,
    client: BackendClient,

    /// Measurement session of the open frame
    session: MeasurementSession,

    /// Frame being measured (if one is loaded)
    frame: Option<FrameContext>,

    /// Loaded frame texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Worker result channel
    sender: Sender<WorkerEvent>,
    receiver: Receiver<WorkerEvent>,

    /// Loading state message
    loading_message: Option<String>,

    /// A save request is in flight
    saving: bool,

    /// Last known backend reachability
    backend_online: Option<bool>,

    /// Pending alert `(title, message)`
    alert: Option<(String, String)>,

    capture_form: dialogs::CaptureForm,
    compare_form: dialogs::CompareForm,
}

impl MeasureApp {
    /// Create the application and start a backend health check.
    pub fn new(config: AppConfig, ctx: &egui::Context) -> Self {
        let (sender, receiver) = channel();
        let app = Self {
            client: BackendClient::from_config(&config),
            session: MeasurementSession::new(config.area_method.clone(), config.max_history),
            config,
            frame: None,
            image_texture: None,
            image_size: None,
            sender,
            receiver,
            loading_message: None,
            saving: false,
            backend_online: None,
            alert: None,
            capture_form: dialogs::CaptureForm::default(),
            compare_form: dialogs::CompareForm::default(),
        };
        app.check_backend(ctx);
        app
    }

    /// Run `job` on a worker thread and wake the UI when it reports.
    fn spawn_worker<F>(&self, ctx: &egui::Context, job: F)
    where
        F: FnOnce(&BackendClient) -> WorkerEvent + Send + 'static,
    {
        let client = self.client.clone();
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let event = job(&client);
            let _ = sender.send(event);
            ctx.request_repaint();
        });
    }

    fn check_backend(&self, ctx: &egui::Context) {
        log::info!("Checking backend at {}", self.client.base_url());
        self.spawn_worker(ctx, |client| WorkerEvent::Health(client.check_health()));
    }

    /// Send a completed measurement to the backend.
    fn dispatch(&self, ctx: &egui::Context, pending: PendingCalculation) {
        self.spawn_worker(ctx, move |client| WorkerEvent::Calculated {
            ticket: pending.ticket,
            result: client.calculate(&pending.request).map_err(|e| e.to_string()),
        });
    }

    /// Load an image file as the frame to measure (asynchronously).
    fn open_image_file(&mut self, ctx: &egui::Context, path: std::path::PathBuf) {
        self.loading_message = Some("Loading image...".to_string());
        self.spawn_worker(ctx, move |_| {
            let result = (|| -> Result<LoadedFrame, String> {
                let (bytes, image) = crate::io::media::load_image(&path)
                    .map_err(|e| format!("Failed to load image: {:#}", e))?;
                let mut frame = FrameContext::new(0, 0.0, FrameSource::Canvas { image: bytes });
                frame.custom_name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned());
                Ok(LoadedFrame { frame, image })
            })();
            WorkerEvent::FrameLoaded(result)
        });
    }

    /// Capture a frame of the session video from the backend (asynchronously).
    fn capture_frame(&mut self, ctx: &egui::Context, timestamp: f64, frame_idx: u64) {
        self.loading_message = Some("Capturing frame...".to_string());
        self.spawn_worker(ctx, move |client| {
            let result = (|| -> Result<LoadedFrame, String> {
                let bytes = client
                    .capture_frame(timestamp, frame_idx)
                    .map_err(|e| format!("Failed to capture frame: {}", e))?;
                let image = crate::io::media::decode_image(&bytes)
                    .map_err(|e| format!("Failed to decode frame: {:#}", e))?;
                let frame = FrameContext::new(frame_idx, timestamp, FrameSource::Backend);
                Ok(LoadedFrame { frame, image })
            })();
            WorkerEvent::FrameLoaded(result)
        });
    }

    fn save_frame(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.frame.clone() else {
            return;
        };
        if let Err(e) = self.session.validate_for_save() {
            self.show_alert("Nothing To Save", e.to_string());
            return;
        }

        self.saving = true;
        let measurements = self.session.measurements().clone();
        log::info!(
            "Saving {} measurement(s) for {}",
            measurements.count(),
            frame.title()
        );
        self.spawn_worker(ctx, move |client| {
            WorkerEvent::Saved(
                client
                    .save_frame(&frame, &measurements)
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn compare_frames(&self, ctx: &egui::Context, current_id: String, baseline_id: String) {
        self.spawn_worker(ctx, move |client| {
            let result = client
                .frame_details(&current_id)
                .and_then(|current| Ok((current, client.frame_details(&baseline_id)?)))
                .map_err(|e| e.to_string());
            WorkerEvent::Compared(result)
        });
    }

    /// Export measurements of the open frame to a file.
    fn export_measurements(&self, path: std::path::PathBuf) {
        let Some(frame) = self.frame.clone() else {
            return;
        };
        let data = FrameExport {
            frame,
            measurements: self.session.measurements().clone(),
        };

        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => crate::io::serialization::export_yaml(&data, &path),
            Some("json") => crate::io::serialization::export_json(&data, &path),
            _ => {
                log::error!("Unsupported file extension: {:?}", extension);
                return;
            }
        };

        match result {
            Ok(_) => log::info!("Exported measurements to {}", path.display()),
            Err(e) => log::error!("Failed to export measurements: {:#}", e),
        }
    }

    /// Import measurements from a file into the open frame.
    fn import_measurements(&mut self, path: std::path::PathBuf) {
        match crate::io::serialization::import_any(&path) {
            Ok(data) => {
                log::info!(
                    "Importing measurements of {} from {}",
                    data.frame.title(),
                    path.display()
                );
                self.session.import_measurements(data.measurements);
            }
            Err(e) => self.show_alert("Import Failed", format!("{:#}", e)),
        }
    }

    fn show_alert(&mut self, title: &str, message: String) {
        self.alert = Some((title.to_string(), message));
    }

    fn handle_worker_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                WorkerEvent::Calculated { ticket, result } => {
                    if let ApplyOutcome::Failed(message) = self.session.apply_result(ticket, result) {
                        self.show_alert("Calculation Failed", message);
                    }
                }
                WorkerEvent::FrameLoaded(Ok(loaded)) => {
                    self.loading_message = None;
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        loaded.image.size(),
                        &loaded.image.pixels,
                    );
                    let texture =
                        ctx.load_texture("frame_image", color_image, egui::TextureOptions::LINEAR);
                    self.image_texture = Some(texture);
                    self.image_size = Some((loaded.image.width, loaded.image.height));

                    // Measurements belong to one frame; start a fresh session
                    self.session = MeasurementSession::new(
                        self.config.area_method.clone(),
                        self.config.max_history,
                    );
                    log::info!("Opened {}", loaded.frame.title());
                    self.frame = Some(loaded.frame);
                }
                WorkerEvent::FrameLoaded(Err(e)) => {
                    self.loading_message = None;
                    log::error!("{}", e);
                    self.show_alert("Frame Not Loaded", e);
                }
                WorkerEvent::Saved(result) => {
                    self.saving = false;
                    match result {
                        Ok(()) => {
                            log::info!("Frame saved");
                            self.show_alert("Saved", "Frame measurements saved.".to_string());
                        }
                        Err(e) => {
                            log::error!("Failed to save frame: {}", e);
                            self.show_alert("Save Failed", e);
                        }
                    }
                }
                WorkerEvent::Health(online) => {
                    self.backend_online = Some(online);
                    if !online {
                        self.show_alert("Backend Unavailable", backend_unavailable_message().to_string());
                    }
                }
                WorkerEvent::Compared(Ok(frames)) => {
                    self.compare_form.frames = Some(frames);
                }
                WorkerEvent::Compared(Err(e)) => {
                    self.show_alert("Comparison Failed", e);
                }
            }
        }
    }

    fn handle_shortcut(&mut self, ctx: &egui::Context, shortcut: Shortcut) {
        // History stays frozen until the in-flight calculation reports
        if self.session.is_busy() {
            log::debug!("Ignoring {:?} while a calculation is in flight", shortcut);
            return;
        }
        match shortcut {
            Shortcut::Undo => {
                self.session.undo();
            }
            Shortcut::Redo => {
                self.session.redo();
            }
            Shortcut::FinishArea => {
                if let Some(pending) = self.session.finish_area_measurement() {
                    self.dispatch(ctx, pending);
                }
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Frame Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "webp"])
                        .pick_file()
                    {
                        self.open_image_file(ctx, path);
                    }
                    ui.close_menu();
                }
                if ui.button("Capture Frame...").clicked() {
                    self.capture_form.open = true;
                    ui.close_menu();
                }
                ui.separator();
                let has_frame = self.frame.is_some();
                ui.add_enabled_ui(has_frame, |ui| {
                    if ui.button("Load Measurements...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Measurements", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.import_measurements(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Export Measurements", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("measurements.yaml")
                                .save_file()
                            {
                                self.export_measurements(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("measurements.json")
                                .save_file()
                            {
                                self.export_measurements(path);
                            }
                            ui.close_menu();
                        }
                    });
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let busy = self.session.is_busy();
                let can_undo = !busy && self.session.can_undo();
                if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                    self.handle_shortcut(ctx, Shortcut::Undo);
                    ui.close_menu();
                }
                let can_redo = !busy && self.session.can_redo();
                if ui.add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                    self.handle_shortcut(ctx, Shortcut::Redo);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(!busy, egui::Button::new("Clear All")).clicked() {
                    self.session.clear_all();
                    ui.close_menu();
                }
            });

            ui.menu_button("Session", |ui| {
                if ui.button("Check Backend Connection").clicked() {
                    self.backend_online = None;
                    self.check_backend(ctx);
                    ui.close_menu();
                }
                if ui.button("Compare With Baseline...").clicked() {
                    self.compare_form.open = true;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (text, color) = match self.backend_online {
                    Some(true) => ("● Backend online", egui::Color32::LIGHT_GREEN),
                    Some(false) => ("● Backend offline", egui::Color32::LIGHT_RED),
                    None => ("● Checking backend...", egui::Color32::GRAY),
                };
                ui.colored_label(color, text);
            });
        });
    }
}

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_worker_events(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        // Toolbar
        let selection = self.session.selection();
        let busy = self.session.is_busy();
        let can_finish_area = matches!(selection, ToolSelection::Tool(ActiveTool::Area(_)))
            && self.session.state().is_ready_to_calculate();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    selection,
                    busy,
                    self.session.can_undo(),
                    self.session.can_redo(),
                    can_finish_area,
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Toggle(tool) => self.session.toggle_tool(tool),
            toolbar::ToolbarAction::FinishArea => self.handle_shortcut(ctx, Shortcut::FinishArea),
            toolbar::ToolbarAction::Undo => self.handle_shortcut(ctx, Shortcut::Undo),
            toolbar::ToolbarAction::Redo => self.handle_shortcut(ctx, Shortcut::Redo),
            toolbar::ToolbarAction::None => {}
        }

        // Measurements panel (right side)
        let measurements: Measurements = self.session.measurements().clone();
        let last_error = self.session.last_error().map(str::to_string);
        let saving = self.saving;
        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| {
                properties::show(
                    ui,
                    &mut self.frame,
                    &measurements,
                    last_error.as_deref(),
                    busy,
                    saving,
                )
            })
            .inner;

        match properties_action {
            properties::PropertiesAction::Save => self.save_frame(ctx),
            properties::PropertiesAction::Retry => {
                if let Some(pending) = self.session.retry_calculation() {
                    self.dispatch(ctx, pending);
                }
            }
            properties::PropertiesAction::ClearAll => self.session.clear_all(),
            properties::PropertiesAction::None => {}
        }

        // Handle keyboard events, unless a text field has focus
        if !ctx.wants_keyboard_input() {
            let shortcuts: Vec<Shortcut> = ctx.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Key {
                            key,
                            pressed: true,
                            modifiers,
                            ..
                        } => shortcut(*key, *modifiers),
                        _ => None,
                    })
                    .collect()
            });
            for s in shortcuts {
                self.handle_shortcut(ctx, s);
            }
        }

        // Main canvas (center)
        let status = self.session.status_text();
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &self.image_texture,
                    self.image_size,
                    self.session.state(),
                    &status,
                )
            })
            .inner;

        if let canvas::CanvasAction::Click { x, y, rect } = canvas_action {
            match self.session.click(x, y, &rect) {
                ClickOutcome::Calculate(pending) => self.dispatch(ctx, pending),
                ClickOutcome::PointAdded { collected } => {
                    log::debug!("{} point(s) collected", collected);
                }
                ClickOutcome::Ignored(reason) => log::debug!("Click ignored: {:?}", reason),
            }
        }

        // Dialogs
        if let Some((timestamp, frame_idx)) = dialogs::capture(ctx, &mut self.capture_form) {
            self.capture_frame(ctx, timestamp, frame_idx);
        }
        if let Some((current, baseline)) = dialogs::compare(ctx, &mut self.compare_form) {
            self.compare_frames(ctx, current, baseline);
        }
        if let Some((title, message)) = &self.alert {
            if !dialogs::alert(ctx, title, message) {
                self.alert = None;
            }
        }

        // Blocking overlay while waiting on the backend
        if let Some(message) = self.session.busy_text() {
            dialogs::busy_overlay(ctx, message);
        } else if let Some(message) = &self.loading_message {
            dialogs::busy_overlay(ctx, message);
        }
    }
}
