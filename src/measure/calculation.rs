// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Backend calculations issued when a measurement completes.

use crate::models::{ActiveTool, DistanceRatioResult, Point};

/// A geometry calculation the backend performs for a completed tool.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationRequest {
    /// Three ordered points, the middle one being the vertex.
    Angle { points: Vec<Point> },
    /// Closed polygon and the named computation method.
    Area { points: Vec<Point>, method: String },
    /// Two end points.
    Distance { points: Vec<Point> },
    /// A horizontal pair followed by a vertical pair.
    DistanceRatio {
        horizontal: Vec<Point>,
        vertical: Vec<Point>,
    },
}

impl CalculationRequest {
    /// Build the request for `tool` from its collected points.
    pub fn for_tool(tool: ActiveTool, points: &[Point], area_method: &str) -> Self {
        match tool {
            ActiveTool::Angle(_) => CalculationRequest::Angle {
                points: points.to_vec(),
            },
            ActiveTool::Area(_) => CalculationRequest::Area {
                points: points.to_vec(),
                method: area_method.to_string(),
            },
            ActiveTool::RawDistance(_) => CalculationRequest::Distance {
                points: points.to_vec(),
            },
            ActiveTool::DistanceRatio => {
                let split = points.len().min(2);
                CalculationRequest::DistanceRatio {
                    horizontal: points[..split].to_vec(),
                    vertical: points[split..].to_vec(),
                }
            }
        }
    }
}

/// The part of a backend response the measurement core keeps.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResult {
    /// Degrees
    Angle(f64),
    /// Square pixels
    Area(f64),
    /// Pixels
    Distance(f64),
    DistanceRatio(DistanceRatioResult),
}

/// Identifies one in-flight calculation and the history state it was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub generation: u64,
    pub tool: ActiveTool,
}

/// A calculation ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCalculation {
    pub ticket: RequestTicket,
    pub request: CalculationRequest,
}
