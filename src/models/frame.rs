// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame metadata for the measurement view.
//!
//! This module describes the video frame being measured, the frame records
//! kept by the backend session, and the on-disk export format.

use super::measurement::Measurements;
use serde::{Deserialize, Serialize};

/// Where the frame image came from, which decides how it is saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FrameSource {
    /// Captured by the backend from the session video; the backend already has the image.
    #[default]
    Backend,
    /// Captured locally; the encoded image is uploaded alongside the measurements.
    Canvas { image: Vec<u8> },
}

/// The frame currently open for manual measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    pub frame_idx: u64,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Replace an already saved frame with the same index.
    #[serde(default)]
    pub override_existing: bool,
    #[serde(skip)]
    pub source: FrameSource,
}

impl FrameContext {
    pub fn new(frame_idx: u64, timestamp: f64, source: FrameSource) -> Self {
        Self {
            frame_idx,
            timestamp,
            custom_name: None,
            override_existing: false,
            source,
        }
    }

    pub fn title(&self) -> String {
        match &self.custom_name {
            Some(name) => format!("{} (frame {} at {:.3}s)", name, self.frame_idx, self.timestamp),
            None => format!("Frame {} at {:.3}s", self.frame_idx, self.timestamp),
        }
    }
}

/// Derived clinical formulas computed by the backend for a saved frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formulas {
    pub p_factor: Option<f64>,
    pub c_factor: Option<f64>,
    pub distance_ratio_1: Option<f64>,
    pub distance_ratio_2: Option<f64>,
    pub distance_ratio_3: Option<f64>,
    pub distance_ratio_4: Option<f64>,
    pub supraglottic_area_ratio_1: Option<f64>,
    pub supraglottic_area_ratio_2: Option<f64>,
}

impl Formulas {
    /// `(name, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("p_factor", self.p_factor),
            ("c_factor", self.c_factor),
            ("distance_ratio_1", self.distance_ratio_1),
            ("distance_ratio_2", self.distance_ratio_2),
            ("distance_ratio_3", self.distance_ratio_3),
            ("distance_ratio_4", self.distance_ratio_4),
            ("supraglottic_area_ratio_1", self.supraglottic_area_ratio_1),
            ("supraglottic_area_ratio_2", self.supraglottic_area_ratio_2),
        ]
    }
}

/// A measured frame as stored in the backend session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDetails {
    pub frame_id: String,
    pub frame_idx: u64,
    pub timestamp: f64,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub formulas: Option<Formulas>,
}

/// Measurements of one frame written to disk by the export menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameExport {
    pub frame: FrameContext,
    pub measurements: Measurements,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_details_tolerates_missing_sections() {
        let json = r#"{
            "frame_id": "f-1",
            "frame_idx": 12,
            "timestamp": 0.4,
            "measurements": { "angle_a": 31.5, "area_b": null }
        }"#;

        let details: FrameDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.measurements.angle_a, Some(31.5));
        assert_eq!(details.measurements.area_b, None);
        assert!(details.formulas.is_none());
    }

    #[test]
    fn test_title_prefers_custom_name() {
        let mut frame = FrameContext::new(7, 1.25, FrameSource::Backend);
        assert_eq!(frame.title(), "Frame 7 at 1.250s");

        frame.custom_name = Some("Peak exercise".to_string());
        assert_eq!(frame.title(), "Peak exercise (frame 7 at 1.250s)");
    }
}
