// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Comparison of a measured frame against the baseline frame.

use crate::models::FrameDetails;

/// How a value relates to the same value on the baseline frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineComparison {
    /// `current / baseline * 100`
    pub percent_of_baseline: f64,
    /// `(current - baseline) / baseline * 100`
    pub percent_change: f64,
}

/// Compare two values; `None` if either is missing or the baseline is zero.
pub fn compare_value(current: Option<f64>, baseline: Option<f64>) -> Option<BaselineComparison> {
    let (current, baseline) = (current?, baseline?);
    if baseline == 0.0 {
        return None;
    }
    Some(BaselineComparison {
        percent_of_baseline: current / baseline * 100.0,
        percent_change: (current - baseline) / baseline * 100.0,
    })
}

/// Compare angles and derived formulas of `current` against `baseline`.
///
/// Raw areas and distances depend on camera position and are not compared.
/// Formulas are compared only when both frames carry them.
pub fn compare_frames(
    current: &FrameDetails,
    baseline: &FrameDetails,
) -> Vec<(&'static str, Option<BaselineComparison>)> {
    let mut comparisons = vec![
        (
            "angle_a",
            compare_value(current.measurements.angle_a, baseline.measurements.angle_a),
        ),
        (
            "angle_b",
            compare_value(current.measurements.angle_b, baseline.measurements.angle_b),
        ),
    ];

    if let (Some(current), Some(baseline)) = (&current.formulas, &baseline.formulas) {
        comparisons.extend(
            current
                .entries()
                .into_iter()
                .zip(baseline.entries())
                .map(|((name, value), (_, base))| (name, compare_value(value, base))),
        );
    }

    comparisons
}

/// Format a percentage with one decimal.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
