//! Actions handled by the [`TraceSession`](super::TraceSession) actor.
//!
//! Two groups share the enum: requests from the UI/console (fields, triggers, clicks,
//! log lines) and progress reports from a running trace pipeline. Every report carries
//! the sequence number of the trace that produced it; the session drops reports whose
//! number is not the latest.

use super::error::TraceError;
use crate::model::{Point, Profile, TraceResult};

/// Partial update of the input fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub origin_text: Option<String>,
    pub destination_text: Option<String>,
    pub profile: Option<Profile>,
    /// Forget points resolved by an earlier trace or map click.
    pub clear_points: bool,
}

/// The distinct ways a trace can be started.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Resolve both text fields.
    FromFields,
    /// Use these points as they are.
    WithPoints { origin: Point, destination: Point },
    /// Live position as origin, destination text field as destination.
    FromHere,
}

#[derive(Debug, Clone)]
pub enum TraceAction {
    SetFields(FieldUpdate),
    Trigger(Trigger),
    MapClick(Point),
    AppendLog(String),
    HackSequence,
    EndHackSequence { generation: u64 },

    // --- Pipeline reports ---
    Resolved { seq: u64, origin: Point, destination: Point },
    Routed { seq: u64, result: TraceResult },
    StreamStep { seq: u64, line: String },
    Finish { seq: u64 },
    Fail { seq: u64, error: TraceError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceActionResult {
    Done,
    /// A new trace with this sequence number is running.
    Started { seq: u64 },
    /// First map click recorded; the next one starts a trace.
    ClickArmed,
    /// Whether a pipeline report belonged to the current trace.
    Applied(bool),
}
