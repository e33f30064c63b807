//! Trace Orchestrator: the session actor that owns the input fields, the log and the
//! current result, and drives one trace at a time.

pub mod actions;
pub mod entity;
pub mod error;
mod pipeline;

pub use actions::*;
pub use entity::*;
pub use error::*;

use crate::clients::TraceClient;
use crate::feed_actor::LogSink;
use crate::framework::{ResourceActor, WeakResourceClient};
use crate::model::Point;
use crate::resolver::CoordinateResolver;
use crate::services::{FeedbackCues, RenderSurface, RoutingService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Read-only view of the device's live position, used when tracing "from here".
#[async_trait]
pub trait SelfPositionSource: Send + Sync {
    async fn current_position(&self) -> Option<Point>;
}

/// Dependencies injected into the trace actor at `run()`.
#[derive(Clone)]
pub struct TraceContext {
    pub resolver: CoordinateResolver,
    pub routing: Arc<dyn RoutingService>,
    pub surface: Arc<dyn RenderSurface>,
    pub cues: Arc<dyn FeedbackCues>,
    pub self_position: Option<Arc<dyn SelfPositionSource>>,
    /// Pause after each streamed analysis line.
    pub pacing: Duration,
    pub hack_duration: Duration,
    /// Handle back to this actor, for pipeline reports and timers.
    pub this: WeakResourceClient<TraceSession>,
}

/// Creates a new trace actor and its client.
pub fn new() -> (ResourceActor<TraceSession>, TraceClient) {
    let (actor, generic_client) = ResourceActor::new(TraceSession::default(), 32);
    (actor, TraceClient::new(generic_client))
}

#[async_trait]
impl LogSink for WeakResourceClient<TraceSession> {
    async fn append(&self, line: String) {
        if let Err(e) = self.perform_action(TraceAction::AppendLog(line)).await {
            debug!(error = %e, "Trace log unavailable");
        }
    }
}
