use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{FrameworkError, ResourceClient, WeakResourceClient};
use crate::model::{Point, Profile};
use crate::trace_actor::{FieldUpdate, TraceAction, TraceActionResult, TraceError, TraceSession, Trigger};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the trace session actor.
///
/// Triggers return as soon as the trace has started; progress shows up in the session
/// log and on the render surface.
#[derive(Clone)]
pub struct TraceClient {
    inner: ResourceClient<TraceSession>,
}

impl TraceClient {
    pub fn new(inner: ResourceClient<TraceSession>) -> Self {
        Self { inner }
    }

    /// A handle that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakResourceClient<TraceSession> {
        self.inner.downgrade()
    }

    #[instrument(skip(self))]
    pub async fn set_fields(&self, update: FieldUpdate) -> Result<(), TraceError> {
        self.perform(TraceAction::SetFields(update)).await?;
        Ok(())
    }

    pub async fn set_origin_text(&self, text: impl Into<String>) -> Result<(), TraceError> {
        self.set_fields(FieldUpdate {
            origin_text: Some(text.into()),
            ..FieldUpdate::default()
        })
        .await
    }

    pub async fn set_destination_text(&self, text: impl Into<String>) -> Result<(), TraceError> {
        self.set_fields(FieldUpdate {
            destination_text: Some(text.into()),
            ..FieldUpdate::default()
        })
        .await
    }

    pub async fn set_profile(&self, profile: Profile) -> Result<(), TraceError> {
        self.set_fields(FieldUpdate {
            profile: Some(profile),
            ..FieldUpdate::default()
        })
        .await
    }

    /// Traces between the two text fields. Returns the new sequence number.
    #[instrument(skip(self))]
    pub async fn trigger_from_fields(&self) -> Result<u64, TraceError> {
        self.trigger(Trigger::FromFields).await
    }

    /// Traces between two explicit points, bypassing the text fields.
    #[instrument(skip(self))]
    pub async fn trigger_with_points(&self, origin: Point, destination: Point) -> Result<u64, TraceError> {
        self.trigger(Trigger::WithPoints { origin, destination }).await
    }

    /// Traces from the live position to the destination text field.
    #[instrument(skip(self))]
    pub async fn trigger_from_here(&self) -> Result<u64, TraceError> {
        self.trigger(Trigger::FromHere).await
    }

    /// Feeds one map click into the two-click protocol. Returns the sequence number when
    /// the click completed a pair and started a trace.
    #[instrument(skip(self))]
    pub async fn map_click(&self, point: Point) -> Result<Option<u64>, TraceError> {
        match self.perform(TraceAction::MapClick(point)).await? {
            TraceActionResult::Started { seq } => Ok(Some(seq)),
            _ => Ok(None),
        }
    }

    pub async fn append_log(&self, line: impl Into<String>) -> Result<(), TraceError> {
        self.perform(TraceAction::AppendLog(line.into())).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn hack_sequence(&self) -> Result<(), TraceError> {
        self.perform(TraceAction::HackSequence).await?;
        Ok(())
    }

    async fn trigger(&self, trigger: Trigger) -> Result<u64, TraceError> {
        debug!(?trigger, "Sending trigger");
        match self.perform(TraceAction::Trigger(trigger)).await? {
            TraceActionResult::Started { seq } => Ok(seq),
            other => Err(TraceError::ActorCommunicationError(format!(
                "unexpected trigger result: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl ActorClient<TraceSession> for TraceClient {
    type Error = TraceError;

    fn inner(&self) -> &ResourceClient<TraceSession> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover_entity_error(e)
    }
}
