//! [`ActorEntity`] implementation for the trace session.
//!
//! The session is the single writer of the input fields, the log and the displayed
//! result. Triggers spawn a [`pipeline`](super::pipeline) task; the task reports each
//! stage back as a seq-tagged action and the session applies only reports from the
//! latest trace.

use super::actions::{FieldUpdate, TraceAction, TraceActionResult, Trigger};
use super::error::TraceError;
use super::{pipeline, TraceContext};
use crate::framework::ActorEntity;
use crate::model::{
    Bounds, Point, PointSource, Profile, TraceOutcome, TraceRequest, TraceResult, TraceState,
};
use crate::services::{Cue, MarkerSlot};
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

pub const DEFAULT_ORIGIN_TEXT: &str = "New York, NY";
pub const DEFAULT_DESTINATION_TEXT: &str = "Boston, MA";

/// Margin around origin and destination when fitting the view.
const FIT_PADDING: f64 = 0.3;

pub const HACK_LINES: [&str; 2] = ["ELEVATING PRIVILEGES… [denied]", "…just kidding 😅"];

#[derive(Debug, Clone)]
pub struct TraceSession {
    pub origin_text: String,
    pub destination_text: String,
    pub profile: Profile,
    /// Points of the latest trace that got past resolution.
    pub origin: Option<Point>,
    pub destination: Option<Point>,
    pub result: Option<TraceResult>,
    pub log: Vec<String>,
    pub state: TraceState,
    pub last_outcome: Option<TraceOutcome>,
    pub hack_active: bool,
    seq: u64,
    started_at: Option<Instant>,
    pending_click: Option<Point>,
    hack_generation: u64,
}

impl Default for TraceSession {
    fn default() -> Self {
        Self {
            origin_text: DEFAULT_ORIGIN_TEXT.to_string(),
            destination_text: DEFAULT_DESTINATION_TEXT.to_string(),
            profile: Profile::default(),
            origin: None,
            destination: None,
            result: None,
            log: Vec::new(),
            state: TraceState::Idle,
            last_outcome: None,
            hack_active: false,
            seq: 0,
            started_at: None,
            pending_click: None,
            hack_generation: 0,
        }
    }
}

impl TraceSession {
    /// Sequence number of the latest trace; 0 before the first trigger.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn busy(&self) -> bool {
        self.state != TraceState::Idle
    }

    /// True between the first and second map click.
    pub fn click_pending(&self) -> bool {
        self.pending_click.is_some()
    }

    fn push_log(&mut self, line: impl Into<String>, ctx: &TraceContext) {
        let line = line.into();
        ctx.surface.log_line(&line);
        self.log.push(line);
    }

    fn is_current(&self, seq: u64) -> bool {
        if seq != self.seq {
            debug!(seq, current = self.seq, "Ignoring report from superseded trace");
            return false;
        }
        true
    }

    fn apply_fields(&mut self, update: FieldUpdate) {
        if let Some(text) = update.origin_text {
            self.origin_text = text;
        }
        if let Some(text) = update.destination_text {
            self.destination_text = text;
        }
        if let Some(profile) = update.profile {
            self.profile = profile;
        }
        if update.clear_points {
            self.origin = None;
            self.destination = None;
        }
    }

    fn request_for(&self, trigger: Trigger) -> TraceRequest {
        let (origin, destination) = match trigger {
            Trigger::FromFields => (
                PointSource::Text(self.origin_text.clone()),
                PointSource::Text(self.destination_text.clone()),
            ),
            Trigger::WithPoints { origin, destination } => {
                (PointSource::Resolved(origin), PointSource::Resolved(destination))
            }
            Trigger::FromHere => (PointSource::LiveSelf, PointSource::Text(self.destination_text.clone())),
        };
        TraceRequest {
            origin,
            destination,
            profile: self.profile.clone(),
        }
    }

    /// Supersedes whatever trace is running and starts a new one.
    fn begin(&mut self, request: TraceRequest, ctx: &TraceContext) -> u64 {
        self.seq += 1;
        let seq = self.seq;

        self.log.clear();
        ctx.surface.clear_log();
        self.result = None;
        ctx.surface.clear_path();
        self.state = TraceState::Resolving;
        self.started_at = Some(Instant::now());
        ctx.cues.play(Cue::Type);

        info!(seq, ?request, "Trace started");
        tokio::spawn(pipeline::run(seq, request, ctx.clone()).instrument(info_span!("trace", seq)));
        seq
    }

    fn finish(&mut self, seq: u64, ctx: &TraceContext) {
        let elapsed_ms = self.started_at.map(|t| t.elapsed().as_millis()).unwrap_or_default();
        let (paths_analyzed, algorithm) = match &self.result {
            Some(result) => (result.paths_analyzed, result.algorithm.clone()),
            None => (0, String::new()),
        };
        self.push_log(format!("paths_analyzed={paths_analyzed}"), ctx);
        self.push_log(format!("algorithm={algorithm}"), ctx);
        self.push_log(format!("time_ms={elapsed_ms}"), ctx);
        self.state = TraceState::Idle;
        self.last_outcome = Some(TraceOutcome::Completed { seq });
        ctx.cues.play(Cue::Route);
        info!(seq, elapsed_ms = elapsed_ms as u64, "Trace completed");
    }

    fn fail(&mut self, seq: u64, error: TraceError, ctx: &TraceContext) {
        warn!(seq, %error, "Trace failed");
        for line in error.log_lines() {
            self.push_log(line, ctx);
        }
        self.state = TraceState::Idle;
        self.last_outcome = Some(TraceOutcome::Failed {
            seq,
            message: error.to_string(),
        });
    }

    fn start_hack_sequence(&mut self, ctx: &TraceContext) {
        for line in HACK_LINES {
            self.push_log(line, ctx);
        }
        ctx.cues.play(Cue::Hack);
        self.hack_active = true;
        ctx.surface.set_hack_sequence(true);

        self.hack_generation += 1;
        let generation = self.hack_generation;
        let this = ctx.this.clone();
        let duration = ctx.hack_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = this.perform_action(TraceAction::EndHackSequence { generation }).await;
        });
    }
}

#[async_trait]
impl ActorEntity for TraceSession {
    type Action = TraceAction;
    type ActionResult = TraceActionResult;
    type Context = TraceContext;
    type Error = TraceError;

    async fn handle_action(
        &mut self,
        action: TraceAction,
        ctx: &TraceContext,
    ) -> Result<TraceActionResult, TraceError> {
        match action {
            TraceAction::SetFields(update) => {
                self.apply_fields(update);
                Ok(TraceActionResult::Done)
            }
            TraceAction::Trigger(trigger) => {
                let request = self.request_for(trigger);
                let seq = self.begin(request, ctx);
                Ok(TraceActionResult::Started { seq })
            }
            TraceAction::MapClick(point) => match self.pending_click.take() {
                None => {
                    ctx.surface.set_marker(MarkerSlot::Origin, point);
                    self.pending_click = Some(point);
                    Ok(TraceActionResult::ClickArmed)
                }
                Some(origin) => {
                    ctx.surface.set_marker(MarkerSlot::Destination, point);
                    let request = self.request_for(Trigger::WithPoints {
                        origin,
                        destination: point,
                    });
                    let seq = self.begin(request, ctx);
                    Ok(TraceActionResult::Started { seq })
                }
            },
            TraceAction::AppendLog(line) => {
                self.push_log(line, ctx);
                Ok(TraceActionResult::Done)
            }
            TraceAction::HackSequence => {
                self.start_hack_sequence(ctx);
                Ok(TraceActionResult::Done)
            }
            TraceAction::EndHackSequence { generation } => {
                if generation == self.hack_generation {
                    self.hack_active = false;
                    ctx.surface.set_hack_sequence(false);
                }
                Ok(TraceActionResult::Done)
            }

            TraceAction::Resolved {
                seq,
                origin,
                destination,
            } => {
                if !self.is_current(seq) {
                    return Ok(TraceActionResult::Applied(false));
                }
                self.origin = Some(origin);
                self.destination = Some(destination);
                ctx.surface.set_marker(MarkerSlot::Origin, origin);
                ctx.surface.set_marker(MarkerSlot::Destination, destination);
                if let Some(bounds) = Bounds::enclosing(&[origin, destination]) {
                    ctx.surface.fit_view(bounds.pad(FIT_PADDING));
                }
                self.state = TraceState::Requesting;
                Ok(TraceActionResult::Applied(true))
            }
            TraceAction::Routed { seq, result } => {
                if !self.is_current(seq) {
                    return Ok(TraceActionResult::Applied(false));
                }
                ctx.surface.draw_path(&result.path, true);
                debug!(seq, points = result.path.len(), steps = result.analysis_steps.len(), "Route received");
                self.result = Some(result);
                self.state = TraceState::StreamingLog;
                Ok(TraceActionResult::Applied(true))
            }
            TraceAction::StreamStep { seq, line } => {
                if !self.is_current(seq) {
                    return Ok(TraceActionResult::Applied(false));
                }
                self.push_log(line, ctx);
                Ok(TraceActionResult::Applied(true))
            }
            TraceAction::Finish { seq } => {
                if !self.is_current(seq) {
                    return Ok(TraceActionResult::Applied(false));
                }
                self.finish(seq, ctx);
                Ok(TraceActionResult::Applied(true))
            }
            TraceAction::Fail { seq, error } => {
                if !self.is_current(seq) {
                    return Ok(TraceActionResult::Applied(false));
                }
                self.fail(seq, error, ctx);
                Ok(TraceActionResult::Applied(true))
            }
        }
    }
}
