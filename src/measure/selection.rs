// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tool selection derived from annotation history.
//!
//! The highlighted tool is never stored separately; it is recomputed from
//! the current history entry so undo/redo re-arms exactly the tool that was
//! mid-measurement without replaying any backend call.

use crate::models::{ActiveTool, AnnotationState};

/// Which half of the distance ratio the user is placing points for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioStep {
    Horizontal,
    Vertical,
}

/// Tool selection shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelection {
    None,
    Tool(ActiveTool),
    /// The distance ratio carries its guidance step.
    DistanceRatio(RatioStep),
}

impl ToolSelection {
    /// The tool that accepts the next click, if any.
    pub fn active_tool(&self) -> Option<ActiveTool> {
        match self {
            ToolSelection::None => None,
            ToolSelection::Tool(tool) => Some(*tool),
            ToolSelection::DistanceRatio(_) => Some(ActiveTool::DistanceRatio),
        }
    }

    pub fn is_selected(&self, tool: ActiveTool) -> bool {
        self.active_tool() == Some(tool)
    }

    pub fn ratio_step(&self) -> Option<RatioStep> {
        match self {
            ToolSelection::DistanceRatio(step) => Some(*step),
            _ => None,
        }
    }
}

/// Derive the UI tool selection from an annotation snapshot.
///
/// Count-completed tools stay selected only while their buffer is still
/// short of the completion count; area tools have no count and stay selected.
pub fn derive_ui_selection(state: &AnnotationState) -> ToolSelection {
    let Some(tool) = state.active_tool else {
        return ToolSelection::None;
    };
    let collected = state.current_points.len();

    match tool {
        ActiveTool::Area(_) => ToolSelection::Tool(tool),
        ActiveTool::DistanceRatio => {
            if collected < 4 {
                let step = if collected <= 2 {
                    RatioStep::Horizontal
                } else {
                    RatioStep::Vertical
                };
                ToolSelection::DistanceRatio(step)
            } else {
                ToolSelection::None
            }
        }
        ActiveTool::Angle(_) | ActiveTool::RawDistance(_) => {
            let required = tool.required_points().unwrap_or(usize::MAX);
            if collected < required {
                ToolSelection::Tool(tool)
            } else {
                ToolSelection::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AngleKind, AreaKind, DistanceKind, Point};

    fn state_with(tool: ActiveTool, points: usize) -> AnnotationState {
        let mut state = AnnotationState::default().with_tool(Some(tool));
        for i in 0..points {
            state = state.with_point(tool, Point::new(i as f64, i as f64));
        }
        state
    }

    #[test]
    fn test_no_tool_clears_selection() {
        assert_eq!(derive_ui_selection(&AnnotationState::default()), ToolSelection::None);
    }

    #[test]
    fn test_angle_selected_until_three_points() {
        let tool = ActiveTool::Angle(AngleKind::A);
        for points in 0..3 {
            assert_eq!(derive_ui_selection(&state_with(tool, points)), ToolSelection::Tool(tool));
        }
        assert_eq!(derive_ui_selection(&state_with(tool, 3)), ToolSelection::None);
    }

    #[test]
    fn test_raw_distance_selected_until_two_points() {
        let tool = ActiveTool::RawDistance(DistanceKind::H);
        assert_eq!(derive_ui_selection(&state_with(tool, 1)), ToolSelection::Tool(tool));
        assert_eq!(derive_ui_selection(&state_with(tool, 2)), ToolSelection::None);
    }

    #[test]
    fn test_area_has_no_count_gate() {
        let tool = ActiveTool::Area(AreaKind::Av);
        assert_eq!(derive_ui_selection(&state_with(tool, 0)), ToolSelection::Tool(tool));
        assert_eq!(derive_ui_selection(&state_with(tool, 12)), ToolSelection::Tool(tool));
    }

    #[test]
    fn test_distance_ratio_steps() {
        let tool = ActiveTool::DistanceRatio;
        let expected = [
            Some(RatioStep::Horizontal),
            Some(RatioStep::Horizontal),
            Some(RatioStep::Horizontal),
            Some(RatioStep::Vertical),
            None,
        ];
        for (points, step) in expected.into_iter().enumerate() {
            let selection = derive_ui_selection(&state_with(tool, points));
            assert_eq!(selection.ratio_step(), step, "with {points} points");
            assert_eq!(selection.active_tool().is_some(), step.is_some());
        }
    }

    #[test]
    fn test_selection_is_exclusive() {
        let tool = ActiveTool::Area(AreaKind::B);
        let selection = derive_ui_selection(&state_with(tool, 1));

        assert!(selection.is_selected(tool));
        assert!(!selection.is_selected(ActiveTool::Area(AreaKind::A)));
        assert!(!selection.is_selected(ActiveTool::Angle(AngleKind::A)));
        assert!(!selection.is_selected(ActiveTool::DistanceRatio));
    }
}
