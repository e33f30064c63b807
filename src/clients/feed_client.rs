use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::feed_actor::{FeedAction, FeedActionResult, FeedError, PositionFeed};
use crate::framework::{FrameworkError, ResourceClient, WeakResourceClient};
use crate::model::{DeviceProfile, Point};
use async_trait::async_trait;
use tracing::instrument;

/// Client for interacting with the position feed actor.
#[derive(Clone)]
pub struct FeedClient {
    inner: ResourceClient<PositionFeed>,
}

impl FeedClient {
    pub fn new(inner: ResourceClient<PositionFeed>) -> Self {
        Self { inner }
    }

    /// A handle that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakResourceClient<PositionFeed> {
        self.inner.downgrade()
    }

    /// (Re)starts acquisition, replacing any installed watch. Returns the start generation.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<u64, FeedError> {
        match self.perform(FeedAction::Start).await? {
            FeedActionResult::Started { generation } => Ok(generation),
            other => Err(FeedError::ActorCommunicationError(format!(
                "unexpected start result: {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), FeedError> {
        self.perform(FeedAction::Stop).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, name: &str) -> Result<DeviceProfile, FeedError> {
        self.perform(FeedAction::Rename(name.to_string())).await?;
        Ok(self.snapshot().await?.device)
    }

    #[instrument(skip(self))]
    pub async fn detect_name(&self) -> Result<DeviceProfile, FeedError> {
        self.perform(FeedAction::DetectName).await?;
        Ok(self.snapshot().await?.device)
    }

    pub async fn self_position(&self) -> Result<Option<Point>, FeedError> {
        Ok(self.snapshot().await?.self_position)
    }
}

#[async_trait]
impl ActorClient<PositionFeed> for FeedClient {
    type Error = FeedError;

    fn inner(&self) -> &ResourceClient<PositionFeed> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        recover_entity_error(e)
    }
}
