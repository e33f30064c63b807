//! Position Feed: keeps a best-effort live position of this device and reports every
//! update to the presence service.

pub mod actions;
mod acquire;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::*;
pub use error::*;

use crate::clients::FeedClient;
use crate::framework::{ResourceActor, WeakResourceClient};
use crate::model::{DeviceProfile, Point};
use crate::services::{DeviceStore, LocationProvider, PresenceService};
use crate::trace_actor::SelfPositionSource;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Where the feed writes `geo_error=` lines.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, line: String);
}

/// Dependencies injected into the feed actor at `run()`.
#[derive(Clone)]
pub struct FeedContext {
    pub provider: Arc<dyn LocationProvider>,
    pub presence: Arc<dyn PresenceService>,
    pub store: Arc<dyn DeviceStore>,
    pub log: Option<Arc<dyn LogSink>>,
    pub high_accuracy_timeout: Duration,
    pub low_accuracy_timeout: Duration,
    /// Handle back to this actor, for task reports.
    pub this: WeakResourceClient<PositionFeed>,
}

/// Creates a new feed actor for `device` and its client.
pub fn new(device: DeviceProfile) -> (ResourceActor<PositionFeed>, FeedClient) {
    let (actor, generic_client) = ResourceActor::new(PositionFeed::new(device), 32);
    (actor, FeedClient::new(generic_client))
}

#[async_trait]
impl SelfPositionSource for WeakResourceClient<PositionFeed> {
    async fn current_position(&self) -> Option<Point> {
        let feed = self.upgrade()?.get().await.ok()?;
        feed.self_position
    }
}
