//! Outbound presentation commands and feedback cues.

use crate::model::{Bounds, Point};
use tracing::{debug, info};

/// Which marker a point is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSlot {
    Origin,
    Destination,
}

/// The map/console view. Calls are fire-and-forget; the view owns its own animation.
pub trait RenderSurface: Send + Sync {
    fn set_marker(&self, slot: MarkerSlot, point: Point);

    /// `incremental` asks the view to animate the path in rather than draw it at once.
    fn draw_path(&self, path: &[Point], incremental: bool);

    fn clear_path(&self);

    fn fit_view(&self, bounds: Bounds);

    fn log_line(&self, line: &str);

    fn clear_log(&self);

    /// Cosmetic flag raised by the console easter egg.
    fn set_hack_sequence(&self, active: bool);
}

/// Short audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A trace was triggered.
    Type,
    /// A trace completed.
    Route,
    /// Console easter egg.
    Hack,
}

pub trait FeedbackCues: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Prints log lines to stdout, and everything else as tracing events.
pub struct TerminalSurface;

impl RenderSurface for TerminalSurface {
    fn set_marker(&self, slot: MarkerSlot, point: Point) {
        info!(?slot, %point, "marker");
    }

    fn draw_path(&self, path: &[Point], incremental: bool) {
        info!(points = path.len(), incremental, "path");
    }

    fn clear_path(&self) {
        debug!("path cleared");
    }

    fn fit_view(&self, bounds: Bounds) {
        info!(south_west = %bounds.south_west, north_east = %bounds.north_east, "fit view");
    }

    fn log_line(&self, line: &str) {
        println!("$ {line}");
    }

    fn clear_log(&self) {
        println!("--");
    }

    fn set_hack_sequence(&self, active: bool) {
        debug!(active, "hack sequence");
    }
}

/// Records cues in the trace output; silent when muted.
pub struct LoggedCues {
    muted: bool,
}

impl LoggedCues {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl FeedbackCues for LoggedCues {
    fn play(&self, cue: Cue) {
        if !self.muted {
            debug!(?cue, "cue");
        }
    }
}
