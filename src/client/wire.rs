// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Request and response bodies of the measurement backend.

use crate::models::{Measurements, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PointsBody<'a> {
    pub points: &'a [Point],
}

#[derive(Debug, Serialize)]
pub struct AreaBody<'a> {
    pub points: &'a [Point],
    pub method: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DistanceRatioBody<'a> {
    pub horizontal_points: &'a [Point],
    pub vertical_points: &'a [Point],
}

#[derive(Debug, Serialize)]
pub struct SaveFrameBody<'a> {
    pub timestamp: f64,
    pub frame_idx: u64,
    pub measurements: &'a Measurements,
    pub override_existing: bool,
}

#[derive(Debug, Deserialize)]
pub struct AngleResponse {
    /// Degrees
    pub angle: f64,
}

/// Area calculation response; only `area_pixels` is kept.
#[derive(Debug, Deserialize)]
pub struct AreaResponse {
    pub area_pixels: f64,
    #[serde(default)]
    pub perimeter_pixels: Option<f64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub point_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceResponse {
    pub distance: f64,
}
