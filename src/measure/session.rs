// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Manual measurement session for one frame.
//!
//! The session owns the undo/redo history of annotation states and is the
//! only place that changes it. Tool selection, point capture, completion and
//! the folding of backend results all go through here; the UI only reads the
//! derived selection and hands back calculation results.

use super::calculation::{CalculationRequest, CalculationResult, PendingCalculation, RequestTicket};
use super::selection::{derive_ui_selection, RatioStep, ToolSelection};
use crate::history::HistoryStore;
use crate::models::{
    ActiveTool, AngleKind, AnnotationState, AreaKind, DistanceKind, Measurements, RatioKind,
    ToolFamily,
};
use crate::util::geometry::{to_image_space, ImageRect};
use std::sync::atomic::{AtomicU64, Ordering};

/// Request ids are unique across sessions, so a response issued for one
/// frame can never match a ticket of a later frame.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Why a click did not change the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A calculation is in flight
    Busy,
    NoActiveTool,
    OutOfBounds,
}

/// Result of handling a click on the frame image.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Ignored(IgnoreReason),
    PointAdded { collected: usize },
    /// The point completed the measurement; the calculation must be sent.
    Calculate(PendingCalculation),
}

/// Result of folding a backend response into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    /// The calculation failed; collected points are kept for a retry.
    Failed(String),
    /// The state changed since the request was issued; the response was dropped.
    Stale,
}

/// Returned when saving is attempted before anything was measured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please measure at least one angle, area, or distance before saving.")]
pub struct NothingMeasured;

/// Interactive measurement state for the frame currently open.
#[derive(Debug)]
pub struct MeasurementSession {
    /// Undo/redo history; the single source of truth
    history: HistoryStore<AnnotationState>,
    /// Method name sent with area calculations
    area_method: String,
    /// Calculation currently awaiting a backend response
    in_flight: Option<RequestTicket>,
    /// Message of the last failed calculation
    last_error: Option<String>,
}

impl MeasurementSession {
    /// Create an empty session.
    pub fn new(area_method: impl Into<String>, max_history: usize) -> Self {
        Self {
            history: HistoryStore::with_max_entries(AnnotationState::default(), max_history),
            area_method: area_method.into(),
            in_flight: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &AnnotationState {
        self.history.current()
    }

    pub fn measurements(&self) -> &Measurements {
        &self.state().measurements
    }

    /// Tool selection the UI should highlight.
    pub fn selection(&self) -> ToolSelection {
        derive_ui_selection(self.state())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn select_angle_tool(&mut self, kind: Option<AngleKind>) {
        self.select_tool(kind.map(ActiveTool::Angle));
    }

    pub fn select_area_tool(&mut self, kind: Option<AreaKind>) {
        self.select_tool(kind.map(ActiveTool::Area));
    }

    pub fn select_raw_distance_tool(&mut self, kind: Option<DistanceKind>) {
        self.select_tool(kind.map(ActiveTool::RawDistance));
    }

    pub fn select_distance_ratio_tool(&mut self, kind: Option<RatioKind>) {
        self.select_tool(kind.map(|_| ActiveTool::DistanceRatio));
    }

    /// Select `tool` through its family's selector, or deselect it when it
    /// is already the selected tool.
    pub fn toggle_tool(&mut self, tool: ActiveTool) {
        match tool {
            ActiveTool::Angle(kind) => self.select_angle_tool(Some(kind)),
            ActiveTool::Area(kind) => self.select_area_tool(Some(kind)),
            ActiveTool::RawDistance(kind) => self.select_raw_distance_tool(Some(kind)),
            ActiveTool::DistanceRatio => self.select_distance_ratio_tool(Some(RatioKind)),
        }
    }

    /// Switch the active tool, discarding any partially collected points.
    ///
    /// Requesting the tool that is already selected deselects it.
    fn select_tool(&mut self, requested: Option<ActiveTool>) {
        let next = match requested {
            Some(tool) if self.selection().is_selected(tool) => None,
            other => other,
        };

        let discarded = self.state().current_points.len();
        if discarded > 0 {
            log::info!("Discarding {} in-progress point(s)", discarded);
        }
        match next {
            Some(tool) => log::info!(
                "Selected {} tool {}",
                tool.family().tool_type(),
                tool.subtype()
            ),
            None => log::info!("Deselected measurement tool"),
        }

        let state = self.state().with_tool(next);
        self.push(state);
    }

    /// Handle a click at a screen position over the rendered frame image.
    pub fn click(&mut self, pointer_x: f64, pointer_y: f64, image_rect: &ImageRect) -> ClickOutcome {
        if self.is_busy() {
            log::warn!("Ignoring click while a calculation is in flight");
            return ClickOutcome::Ignored(IgnoreReason::Busy);
        }
        let Some(tool) = self.selection().active_tool() else {
            log::debug!("Ignoring click, no measurement tool selected");
            return ClickOutcome::Ignored(IgnoreReason::NoActiveTool);
        };
        let Some(point) = to_image_space(pointer_x, pointer_y, image_rect) else {
            log::debug!("Ignoring click outside image bounds");
            return ClickOutcome::Ignored(IgnoreReason::OutOfBounds);
        };

        let state = self.state().with_point(tool, point);
        let collected = state.current_points.len();
        self.push(state);
        log::info!(
            "Added point ({:.1}, {:.1}) for {}, total points: {}",
            point.x,
            point.y,
            tool.subtype(),
            collected
        );

        match tool.required_points() {
            Some(required) if collected == required => ClickOutcome::Calculate(self.issue(tool)),
            _ => ClickOutcome::PointAdded { collected },
        }
    }

    /// Finish the area polygon being drawn.
    ///
    /// Only valid while an area tool is active with at least three points.
    pub fn finish_area_measurement(&mut self) -> Option<PendingCalculation> {
        if self.is_busy() {
            return None;
        }
        let active = self.state().active_tool;
        match active {
            Some(tool @ ActiveTool::Area(_)) if self.state().is_ready_to_calculate() => {
                Some(self.issue(tool))
            }
            _ => None,
        }
    }

    /// Re-send the calculation for a complete buffer, typically after a failure.
    pub fn retry_calculation(&mut self) -> Option<PendingCalculation> {
        if self.is_busy() || !self.state().is_ready_to_calculate() {
            return None;
        }
        let tool = self.state().active_tool?;
        log::info!("Retrying {} calculation", tool.subtype());
        Some(self.issue(tool))
    }

    /// Fold a backend response into the history.
    ///
    /// Responses are applied only if the history is still at the state the
    /// request was issued from.
    pub fn apply_result(
        &mut self,
        ticket: RequestTicket,
        result: Result<CalculationResult, String>,
    ) -> ApplyOutcome {
        let current = self.in_flight.map(|t| t.id) == Some(ticket.id);
        if !current || ticket.generation != self.history.generation() {
            log::warn!(
                "Discarding stale {} result (request {})",
                ticket.tool.subtype(),
                ticket.id
            );
            return ApplyOutcome::Stale;
        }
        self.in_flight = None;

        let folded = result.and_then(|result| self.fold_result(ticket.tool, result));
        match folded {
            Ok(measurements) => {
                let state = self.state().completed(measurements);
                self.history.set(state);
                self.last_error = None;
                log::info!("Completed {} measurement", ticket.tool.subtype());
                ApplyOutcome::Applied
            }
            Err(message) => {
                log::error!("Failed to calculate {}: {}", ticket.tool.subtype(), message);
                self.last_error = Some(message.clone());
                ApplyOutcome::Failed(message)
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.abandon_in_flight();
        let undone = self.history.undo().is_some();
        if undone {
            self.last_error = None;
            log::info!("Undo");
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_in_flight();
        let redone = self.history.redo().is_some();
        if redone {
            self.last_error = None;
            log::info!("Redo");
        }
        redone
    }

    /// Drop every measurement and start a fresh history.
    pub fn clear_all(&mut self) {
        self.abandon_in_flight();
        self.history.reset(AnnotationState::default());
        self.last_error = None;
        log::info!("Cleared all measurements");
    }

    /// Replace the measurements with imported ones, as an undoable step.
    pub fn import_measurements(&mut self, measurements: Measurements) {
        log::info!("Imported {} measurement(s)", measurements.count());
        self.push(AnnotationState {
            measurements,
            ..Default::default()
        });
    }

    pub fn validate_for_save(&self) -> Result<(), NothingMeasured> {
        if self.measurements().is_empty() {
            Err(NothingMeasured)
        } else {
            Ok(())
        }
    }

    /// Guidance text for the tool being used.
    pub fn status_text(&self) -> String {
        let collected = self.state().current_points.len();
        match self.selection() {
            ToolSelection::Tool(ActiveTool::Area(kind)) => {
                let hint = if collected >= crate::models::annotation::MIN_AREA_POINTS {
                    " (press Enter to finish)"
                } else {
                    ""
                };
                format!("{}: {} points{}", kind.key().label(), collected, hint)
            }
            ToolSelection::Tool(tool) => {
                let required = tool.required_points().unwrap_or(0);
                format!("{}: {}/{} points", tool.label(), collected, required)
            }
            ToolSelection::DistanceRatio(step) => {
                let which = if collected % 2 == 0 { "first" } else { "second" };
                let axis = match step {
                    RatioStep::Horizontal if collected < 2 => "horizontal",
                    _ => "vertical",
                };
                format!("Distance Ratio - Click {} {} point", which, axis)
            }
            ToolSelection::None => match (&self.last_error, self.state().is_ready_to_calculate()) {
                (Some(_), true) => "Calculation failed - retry or pick another tool".to_string(),
                _ => String::new(),
            },
        }
    }

    /// Overlay text while a calculation is in flight.
    pub fn busy_text(&self) -> Option<&'static str> {
        self.in_flight.map(|ticket| match ticket.tool.family() {
            ToolFamily::Angle => "Calculating angle...",
            ToolFamily::Area => "Calculating area...",
            ToolFamily::RawDistance => "Calculating distance...",
            ToolFamily::DistanceRatio => "Calculating distance ratio...",
        })
    }

    fn push(&mut self, state: AnnotationState) {
        self.abandon_in_flight();
        self.history.set(state);
        self.last_error = None;
        log::debug!(
            "History entry {}/{}",
            self.history.cursor() + 1,
            self.history.len()
        );
    }

    fn abandon_in_flight(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            log::warn!(
                "Abandoning in-flight {} calculation (request {})",
                ticket.tool.subtype(),
                ticket.id
            );
        }
    }

    fn issue(&mut self, tool: ActiveTool) -> PendingCalculation {
        let request =
            CalculationRequest::for_tool(tool, &self.state().current_points, &self.area_method);
        let ticket = RequestTicket {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            generation: self.history.generation(),
            tool,
        };
        self.in_flight = Some(ticket);
        log::info!("Requesting {} calculation (request {})", tool.subtype(), ticket.id);
        PendingCalculation { ticket, request }
    }

    fn fold_result(
        &self,
        tool: ActiveTool,
        result: CalculationResult,
    ) -> Result<Measurements, String> {
        let mut measurements = self.measurements().clone();
        match (tool, result) {
            (ActiveTool::Angle(kind), CalculationResult::Angle(degrees)) => {
                measurements.set(kind.key(), Some(degrees));
            }
            (ActiveTool::Area(kind), CalculationResult::Area(pixels)) => {
                measurements.set(kind.key(), Some(pixels));
            }
            (ActiveTool::RawDistance(kind), CalculationResult::Distance(pixels)) => {
                measurements.set(kind.key(), Some(pixels));
            }
            (ActiveTool::DistanceRatio, CalculationResult::DistanceRatio(ratio)) => {
                measurements.distance_ratio = Some(ratio);
            }
            (tool, other) => {
                return Err(format!("Unexpected response {:?} for {}", other, tool.subtype()));
            }
        }
        Ok(measurements)
    }
}
