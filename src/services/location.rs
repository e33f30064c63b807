//! Location capability providers.
//!
//! A provider offers the permission → single fix → continuous watch protocol. The feed
//! never cares which provider it got; [`select_provider`] substitutes a fallback when the
//! primary capability is missing.

use crate::model::{Accuracy, LocationFault, Point, WatchId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Events delivered by a watch subscription, in provider order.
pub type WatchEvents = mpsc::UnboundedReceiver<Result<Point, LocationFault>>;

/// An installed watch. The event stream ends once the provider clears the watch.
#[derive(Debug)]
pub struct WatchSubscription {
    pub id: WatchId,
    pub events: WatchEvents,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether the capability exists on this platform at all.
    fn is_available(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> Result<(), LocationFault>;

    /// One fix. Implementations should give up after `timeout`.
    async fn current_position(&self, accuracy: Accuracy, timeout: Duration) -> Result<Point, LocationFault>;

    async fn watch_position(&self, accuracy: Accuracy) -> Result<WatchSubscription, LocationFault>;

    fn clear_watch(&self, id: WatchId);
}

/// Returns `primary` when it reports itself available, `fallback` otherwise.
pub fn select_provider(
    primary: Option<Arc<dyn LocationProvider>>,
    fallback: Arc<dyn LocationProvider>,
) -> Arc<dyn LocationProvider> {
    match primary {
        Some(p) if p.is_available() => {
            info!(provider = p.name(), "Using primary location provider");
            p
        }
        _ => {
            info!(provider = fallback.name(), "Primary location provider unavailable, falling back");
            fallback
        }
    }
}

type WatchSenders = HashMap<WatchId, mpsc::UnboundedSender<Result<Point, LocationFault>>>;

/// Serves a fixed, configured position. Unavailable when no position is configured.
pub struct ConfiguredLocationProvider {
    position: Option<Point>,
    next_watch: AtomicU64,
    watches: Mutex<WatchSenders>,
}

impl ConfiguredLocationProvider {
    pub fn new(position: Option<Point>) -> Self {
        Self {
            position,
            next_watch: AtomicU64::new(1),
            watches: Mutex::new(HashMap::new()),
        }
    }

    fn fix(&self) -> Result<Point, LocationFault> {
        self.position
            .ok_or_else(|| LocationFault::unavailable("no configured position"))
    }

    fn watches(&self) -> std::sync::MutexGuard<'_, WatchSenders> {
        self.watches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocationProvider {
    fn name(&self) -> &str {
        "configured"
    }

    fn is_available(&self) -> bool {
        self.position.is_some()
    }

    async fn request_permission(&self) -> Result<(), LocationFault> {
        Ok(())
    }

    async fn current_position(&self, _accuracy: Accuracy, _timeout: Duration) -> Result<Point, LocationFault> {
        self.fix()
    }

    async fn watch_position(&self, _accuracy: Accuracy) -> Result<WatchSubscription, LocationFault> {
        let point = self.fix()?;
        let id = WatchId(self.next_watch.fetch_add(1, Ordering::SeqCst));
        let (sender, events) = mpsc::unbounded_channel();
        let _ = sender.send(Ok(point));
        self.watches().insert(id, sender);
        Ok(WatchSubscription { id, events })
    }

    fn clear_watch(&self, id: WatchId) {
        self.watches().remove(&id);
    }
}

/// Stand-in when no capability exists: every call reports the service as unavailable.
pub struct UnavailableLocationProvider;

#[async_trait]
impl LocationProvider for UnavailableLocationProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn request_permission(&self) -> Result<(), LocationFault> {
        Ok(())
    }

    async fn current_position(&self, _accuracy: Accuracy, _timeout: Duration) -> Result<Point, LocationFault> {
        Err(LocationFault::unavailable("location services are not available"))
    }

    async fn watch_position(&self, _accuracy: Accuracy) -> Result<WatchSubscription, LocationFault> {
        Err(LocationFault::unavailable("location services are not available"))
    }

    fn clear_watch(&self, _id: WatchId) {}
}
