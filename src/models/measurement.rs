// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurement data structures.
//!
//! This module defines image-space points, the closed set of measurement
//! slots a frame can carry, and the per-frame measurement record.

use serde::{Deserialize, Serialize};

/// A 2D point in the rendered frame image's local pixel space.
///
/// Origin is the top-left corner of the image. Serialized as `[x, y]`,
/// which is what the measurement backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Category of geometric measurement, each with its own completion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFamily {
    Angle,
    Area,
    RawDistance,
    DistanceRatio,
}

impl ToolFamily {
    /// Tool type name as recorded in annotation history (`angle`, `area`, `distance`).
    ///
    /// Raw distances and the distance ratio share the `distance` type and are
    /// told apart by subtype.
    pub fn tool_type(&self) -> &'static str {
        match self {
            ToolFamily::Angle => "angle",
            ToolFamily::Area => "area",
            ToolFamily::RawDistance | ToolFamily::DistanceRatio => "distance",
        }
    }
}

/// One of the ten scalar measurement slots of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKey {
    AngleA,
    AngleB,
    AreaA,
    AreaB,
    AreaAv,
    AreaBv,
    DistanceA,
    DistanceC,
    DistanceG,
    DistanceH,
}

impl MeasurementKey {
    /// All keys in display order.
    pub const ALL: [MeasurementKey; 10] = [
        MeasurementKey::AngleA,
        MeasurementKey::AngleB,
        MeasurementKey::AreaA,
        MeasurementKey::AreaB,
        MeasurementKey::AreaAv,
        MeasurementKey::AreaBv,
        MeasurementKey::DistanceA,
        MeasurementKey::DistanceC,
        MeasurementKey::DistanceG,
        MeasurementKey::DistanceH,
    ];

    pub fn family(&self) -> ToolFamily {
        match self {
            MeasurementKey::AngleA | MeasurementKey::AngleB => ToolFamily::Angle,
            MeasurementKey::AreaA
            | MeasurementKey::AreaB
            | MeasurementKey::AreaAv
            | MeasurementKey::AreaBv => ToolFamily::Area,
            MeasurementKey::DistanceA
            | MeasurementKey::DistanceC
            | MeasurementKey::DistanceG
            | MeasurementKey::DistanceH => ToolFamily::RawDistance,
        }
    }

    /// Wire name of the slot (`angle_a`, `area_bv`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::AngleA => "angle_a",
            MeasurementKey::AngleB => "angle_b",
            MeasurementKey::AreaA => "area_a",
            MeasurementKey::AreaB => "area_b",
            MeasurementKey::AreaAv => "area_av",
            MeasurementKey::AreaBv => "area_bv",
            MeasurementKey::DistanceA => "distance_a",
            MeasurementKey::DistanceC => "distance_c",
            MeasurementKey::DistanceG => "distance_g",
            MeasurementKey::DistanceH => "distance_h",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKey::AngleA => "Angle A",
            MeasurementKey::AngleB => "Angle B",
            MeasurementKey::AreaA => "Area A",
            MeasurementKey::AreaB => "Area B",
            MeasurementKey::AreaAv => "Area AV",
            MeasurementKey::AreaBv => "Area BV",
            MeasurementKey::DistanceA => "Distance A",
            MeasurementKey::DistanceC => "Distance C",
            MeasurementKey::DistanceG => "Distance G",
            MeasurementKey::DistanceH => "Distance H",
        }
    }

    /// Unit suffix used when displaying a value.
    pub fn unit(&self) -> &'static str {
        match self.family() {
            ToolFamily::Angle => "°",
            ToolFamily::Area => " px²",
            ToolFamily::RawDistance | ToolFamily::DistanceRatio => " px",
        }
    }
}

/// Structured result of the legacy four-point distance ratio measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRatioResult {
    pub horizontal_distance: f64,
    pub vertical_distance: f64,
    /// `horizontal / vertical * 100`
    pub ratio_percentage: f64,
    pub horizontal_points: Vec<Point>,
    pub vertical_points: Vec<Point>,
}

/// Completed measurements for the frame under measurement.
///
/// Unset slots serialize as `null` so the backend always receives the full
/// ten-key map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub angle_a: Option<f64>,
    pub angle_b: Option<f64>,
    pub area_a: Option<f64>,
    pub area_b: Option<f64>,
    pub area_av: Option<f64>,
    pub area_bv: Option<f64>,
    pub distance_a: Option<f64>,
    pub distance_c: Option<f64>,
    pub distance_g: Option<f64>,
    pub distance_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_ratio: Option<DistanceRatioResult>,
}

impl Measurements {
    pub fn get(&self, key: MeasurementKey) -> Option<f64> {
        match key {
            MeasurementKey::AngleA => self.angle_a,
            MeasurementKey::AngleB => self.angle_b,
            MeasurementKey::AreaA => self.area_a,
            MeasurementKey::AreaB => self.area_b,
            MeasurementKey::AreaAv => self.area_av,
            MeasurementKey::AreaBv => self.area_bv,
            MeasurementKey::DistanceA => self.distance_a,
            MeasurementKey::DistanceC => self.distance_c,
            MeasurementKey::DistanceG => self.distance_g,
            MeasurementKey::DistanceH => self.distance_h,
        }
    }

    pub fn set(&mut self, key: MeasurementKey, value: Option<f64>) {
        let slot = match key {
            MeasurementKey::AngleA => &mut self.angle_a,
            MeasurementKey::AngleB => &mut self.angle_b,
            MeasurementKey::AreaA => &mut self.area_a,
            MeasurementKey::AreaB => &mut self.area_b,
            MeasurementKey::AreaAv => &mut self.area_av,
            MeasurementKey::AreaBv => &mut self.area_bv,
            MeasurementKey::DistanceA => &mut self.distance_a,
            MeasurementKey::DistanceC => &mut self.distance_c,
            MeasurementKey::DistanceG => &mut self.distance_g,
            MeasurementKey::DistanceH => &mut self.distance_h,
        };
        *slot = value;
    }

    /// True when no measurement of any family has been taken.
    pub fn is_empty(&self) -> bool {
        self.distance_ratio.is_none() && MeasurementKey::ALL.iter().all(|key| self.get(*key).is_none())
    }

    /// Number of scalar slots holding a value.
    pub fn count(&self) -> usize {
        MeasurementKey::ALL
            .iter()
            .filter(|key| self.get(**key).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(10.0, 20.5)).unwrap();
        assert_eq!(json, "[10.0,20.5]");

        let point: Point = serde_json::from_str("[3.0, 4.0]").unwrap();
        assert_eq!(point, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_measurements_serialize_full_key_set() {
        let mut measurements = Measurements::default();
        measurements.set(MeasurementKey::AngleA, Some(42.0));

        let value = serde_json::to_value(&measurements).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 10);
        assert_eq!(object["angle_a"], serde_json::json!(42.0));
        assert!(object["area_bv"].is_null());
        assert!(!object.contains_key("distance_ratio"));
    }

    #[test]
    fn test_get_set_cover_every_key() {
        let mut measurements = Measurements::default();
        for (i, key) in MeasurementKey::ALL.iter().enumerate() {
            measurements.set(*key, Some(i as f64));
        }
        for (i, key) in MeasurementKey::ALL.iter().enumerate() {
            assert_eq!(measurements.get(*key), Some(i as f64));
        }
        assert_eq!(measurements.count(), 10);
    }

    #[test]
    fn test_is_empty_considers_distance_ratio() {
        let mut measurements = Measurements::default();
        assert!(measurements.is_empty());

        measurements.distance_ratio = Some(DistanceRatioResult {
            horizontal_distance: 10.0,
            vertical_distance: 20.0,
            ratio_percentage: 50.0,
            horizontal_points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            vertical_points: vec![Point::new(0.0, 0.0), Point::new(0.0, 20.0)],
        });
        assert!(!measurements.is_empty());
    }

    #[test]
    fn test_key_wire_names_match_serde() {
        for key in MeasurementKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}
