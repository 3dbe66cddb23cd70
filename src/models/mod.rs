// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the measurement core, backend client and UI.

pub mod annotation;
pub mod frame;
pub mod measurement;

pub use annotation::{ActiveTool, AngleKind, AnnotationState, AreaKind, DistanceKind, RatioKind};
pub use frame::{FrameContext, FrameDetails, FrameExport, FrameSource, Formulas};
pub use measurement::{DistanceRatioResult, MeasurementKey, Measurements, Point, ToolFamily};
