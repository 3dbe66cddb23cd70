// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Manual measurement core.
//!
//! Tool selection, point capture, completion detection and the undo/redo
//! reconciliation of a single frame's annotations. Nothing here performs
//! I/O: completed measurements come out as [`PendingCalculation`]s and
//! backend responses go back in through [`MeasurementSession::apply_result`].

pub mod baseline;
pub mod calculation;
pub mod keys;
pub mod selection;
pub mod session;

pub use calculation::{CalculationRequest, CalculationResult, PendingCalculation, RequestTicket};
pub use keys::Shortcut;
pub use selection::{RatioStep, ToolSelection};
pub use session::{ApplyOutcome, ClickOutcome, MeasurementSession};
