// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation state tracked by the undo/redo history.
//!
//! This module defines the active measurement tool and the snapshot of
//! in-progress and completed measurements for one frame.

use super::measurement::{MeasurementKey, Measurements, Point, ToolFamily};

/// Angle measurement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleKind {
    A,
    B,
}

/// Area measurement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    A,
    B,
    Av,
    Bv,
}

/// Raw two-point distance slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceKind {
    A,
    C,
    G,
    H,
}

impl AngleKind {
    pub const ALL: [AngleKind; 2] = [AngleKind::A, AngleKind::B];

    pub fn key(&self) -> MeasurementKey {
        match self {
            AngleKind::A => MeasurementKey::AngleA,
            AngleKind::B => MeasurementKey::AngleB,
        }
    }
}

impl AreaKind {
    pub const ALL: [AreaKind; 4] = [AreaKind::A, AreaKind::B, AreaKind::Av, AreaKind::Bv];

    pub fn key(&self) -> MeasurementKey {
        match self {
            AreaKind::A => MeasurementKey::AreaA,
            AreaKind::B => MeasurementKey::AreaB,
            AreaKind::Av => MeasurementKey::AreaAv,
            AreaKind::Bv => MeasurementKey::AreaBv,
        }
    }
}

impl DistanceKind {
    pub const ALL: [DistanceKind; 4] = [
        DistanceKind::A,
        DistanceKind::C,
        DistanceKind::G,
        DistanceKind::H,
    ];

    pub fn key(&self) -> MeasurementKey {
        match self {
            DistanceKind::A => MeasurementKey::DistanceA,
            DistanceKind::C => MeasurementKey::DistanceC,
            DistanceKind::G => MeasurementKey::DistanceG,
            DistanceKind::H => MeasurementKey::DistanceH,
        }
    }
}

/// The distance ratio's only subtype, so its selector takes `Option<kind>`
/// like the other families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatioKind;

/// The measurement tool currently collecting points.
///
/// Only one tool can be active at a time; the enum makes that exclusive by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveTool {
    Angle(AngleKind),
    Area(AreaKind),
    RawDistance(DistanceKind),
    DistanceRatio,
}

impl ActiveTool {
    pub fn family(&self) -> ToolFamily {
        match self {
            ActiveTool::Angle(_) => ToolFamily::Angle,
            ActiveTool::Area(_) => ToolFamily::Area,
            ActiveTool::RawDistance(_) => ToolFamily::RawDistance,
            ActiveTool::DistanceRatio => ToolFamily::DistanceRatio,
        }
    }

    /// Scalar slot this tool writes; the distance ratio has a structured result instead.
    pub fn key(&self) -> Option<MeasurementKey> {
        match self {
            ActiveTool::Angle(kind) => Some(kind.key()),
            ActiveTool::Area(kind) => Some(kind.key()),
            ActiveTool::RawDistance(kind) => Some(kind.key()),
            ActiveTool::DistanceRatio => None,
        }
    }

    /// Subtype name (`angle_a`, `distance_ratio`, ...).
    pub fn subtype(&self) -> &'static str {
        self.key().map_or("distance_ratio", |key| key.as_str())
    }

    pub fn label(&self) -> &'static str {
        self.key().map_or("Distance Ratio", |key| key.label())
    }

    /// Number of points that completes a measurement, or `None` for tools
    /// finished by an explicit action.
    pub fn required_points(&self) -> Option<usize> {
        match self {
            ActiveTool::Angle(_) => Some(3),
            ActiveTool::RawDistance(_) => Some(2),
            ActiveTool::DistanceRatio => Some(4),
            ActiveTool::Area(_) => None,
        }
    }
}

/// Minimum number of polygon vertices before an area can be finished.
pub const MIN_AREA_POINTS: usize = 3;

/// Snapshot of one frame's annotation process, stored in the undo/redo history.
///
/// Invariant: a non-empty `current_points` implies `active_tool` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationState {
    pub measurements: Measurements,
    pub current_points: Vec<Point>,
    pub active_tool: Option<ActiveTool>,
}

impl AnnotationState {
    /// Copy of this state with an empty buffer and the given tool active.
    pub fn with_tool(&self, tool: Option<ActiveTool>) -> Self {
        Self {
            measurements: self.measurements.clone(),
            current_points: Vec::new(),
            active_tool: tool,
        }
    }

    /// Copy of this state with one more collected point for `tool`.
    pub fn with_point(&self, tool: ActiveTool, point: Point) -> Self {
        let mut current_points = self.current_points.clone();
        current_points.push(point);
        Self {
            measurements: self.measurements.clone(),
            current_points,
            active_tool: Some(tool),
        }
    }

    /// Copy of this state with new measurements and no tool in progress.
    pub fn completed(&self, measurements: Measurements) -> Self {
        Self {
            measurements,
            current_points: Vec::new(),
            active_tool: None,
        }
    }

    /// True when the buffer holds everything the active tool needs to calculate.
    pub fn is_ready_to_calculate(&self) -> bool {
        match self.active_tool {
            Some(tool) => match tool.required_points() {
                Some(required) => self.current_points.len() == required,
                None => self.current_points.len() >= MIN_AREA_POINTS,
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_names() {
        assert_eq!(ActiveTool::Angle(AngleKind::B).subtype(), "angle_b");
        assert_eq!(ActiveTool::Area(AreaKind::Bv).subtype(), "area_bv");
        assert_eq!(ActiveTool::RawDistance(DistanceKind::G).subtype(), "distance_g");
        assert_eq!(ActiveTool::DistanceRatio.subtype(), "distance_ratio");
    }

    #[test]
    fn test_tool_types_share_distance() {
        assert_eq!(ActiveTool::RawDistance(DistanceKind::A).family().tool_type(), "distance");
        assert_eq!(ActiveTool::DistanceRatio.family().tool_type(), "distance");
        assert_eq!(ActiveTool::Area(AreaKind::A).family().tool_type(), "area");
    }

    #[test]
    fn test_with_point_keeps_previous_snapshot_untouched() {
        let empty = AnnotationState::default();
        let tool = ActiveTool::Angle(AngleKind::A);

        let one = empty.with_point(tool, Point::new(1.0, 2.0));
        let two = one.with_point(tool, Point::new(3.0, 4.0));

        assert!(empty.current_points.is_empty());
        assert_eq!(one.current_points.len(), 1);
        assert_eq!(two.current_points.len(), 2);
        assert_eq!(two.active_tool, Some(tool));
    }

    #[test]
    fn test_ready_to_calculate() {
        let tool = ActiveTool::RawDistance(DistanceKind::C);
        let state = AnnotationState::default()
            .with_point(tool, Point::new(0.0, 0.0));
        assert!(!state.is_ready_to_calculate());
        let state = state.with_point(tool, Point::new(5.0, 0.0));
        assert!(state.is_ready_to_calculate());

        let area = ActiveTool::Area(AreaKind::A);
        let mut state = AnnotationState::default().with_tool(Some(area));
        for i in 0..MIN_AREA_POINTS {
            assert!(!state.is_ready_to_calculate());
            state = state.with_point(area, Point::new(i as f64, 0.0));
        }
        assert!(state.is_ready_to_calculate());
    }
}
