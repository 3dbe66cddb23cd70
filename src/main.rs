// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame Measure
//!
//! A cross-platform desktop application for manually measuring angles,
//! areas and distances on video frames, with the geometry computed by a
//! measurement backend.

mod app;
mod client;
mod config;
mod history;
mod io;
mod measure;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::MeasureApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Using backend at {}", config.backend_url);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Frame Measure"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Frame Measure",
        options,
        Box::new(move |cc| Ok(Box::new(MeasureApp::new(config, &cc.egui_ctx)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
