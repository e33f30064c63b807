//! [`ActorEntity`] implementation for the position feed.

use super::actions::{FeedAction, FeedActionResult};
use super::error::FeedError;
use super::{acquire, FeedContext};
use crate::framework::ActorEntity;
use crate::model::{
    default_device_name, DeviceProfile, FaultKind, LocationFault, Point, PresenceUpdate, RemoteDevice, WatchId,
};
use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    #[default]
    Stopped,
    Acquiring,
    Watching,
    /// Permission was refused; nothing runs until the next start.
    Denied,
    /// No watch could be installed; nothing runs until the next start.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct PositionFeed {
    pub device: DeviceProfile,
    pub self_position: Option<Point>,
    pub fault: Option<LocationFault>,
    pub phase: FeedPhase,
    watch: Option<WatchId>,
    generation: u64,
}

impl PositionFeed {
    pub fn new(device: DeviceProfile) -> Self {
        Self {
            device,
            self_position: None,
            fault: None,
            phase: FeedPhase::Stopped,
            watch: None,
            generation: 0,
        }
    }

    /// The installed watch subscription, if any.
    pub fn watch(&self) -> Option<WatchId> {
        self.watch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Ignoring report from superseded start");
            return false;
        }
        true
    }

    fn clear_watch(&mut self, ctx: &FeedContext) {
        if let Some(id) = self.watch.take() {
            ctx.provider.clear_watch(id);
            info!(%id, "Cleared watch");
        }
    }

    fn persist(&self, ctx: &FeedContext) -> Result<(), FeedError> {
        ctx.store.save(&self.device)?;
        Ok(())
    }

    fn update_position(&mut self, point: Point, ctx: &FeedContext) {
        self.self_position = Some(point);
        if self.fault.take().is_some() {
            info!("Location fault cleared");
        }

        let update = PresenceUpdate {
            device_id: self.device.device_id.clone(),
            device_name: self.device.device_name.clone(),
            location: point,
        };
        let presence = ctx.presence.clone();
        let this = ctx.this.clone();
        tokio::spawn(
            async move {
                match presence.upload(&update).await {
                    Ok(Some(remote)) => {
                        let _ = this.perform_action(FeedAction::MergeRemote(remote)).await;
                    }
                    Ok(None) => {}
                    Err(e) => debug!(error = %e, "Presence upload failed"),
                }
            }
            .instrument(info_span!("presence_upload")),
        );
    }

    async fn record_fault(&mut self, fault: LocationFault, ctx: &FeedContext) {
        warn!(%fault, "Location fault");
        if fault.kind == FaultKind::PermissionDenied {
            self.phase = FeedPhase::Denied;
        }
        if let Some(log) = &ctx.log {
            log.append(fault.log_line()).await;
        }
        self.fault = Some(fault);
    }

    fn merge(&mut self, remote: &RemoteDevice, ctx: &FeedContext) {
        if self.device.merge_remote(remote) {
            info!(device_id = %self.device.device_id, "Device profile updated from presence service");
            if let Err(e) = self.persist(ctx) {
                warn!(error = %e, "Failed to persist device profile");
            }
        }
    }
}

#[async_trait]
impl ActorEntity for PositionFeed {
    type Action = FeedAction;
    type ActionResult = FeedActionResult;
    type Context = FeedContext;
    type Error = FeedError;

    async fn on_start(&mut self, ctx: &FeedContext) -> Result<(), FeedError> {
        let presence = ctx.presence.clone();
        let this = ctx.this.clone();
        let device_id = self.device.device_id.clone();
        tokio::spawn(async move {
            match presence.fetch(&device_id).await {
                Ok(Some(remote)) => {
                    let _ = this.perform_action(FeedAction::Bootstrap(remote)).await;
                }
                Ok(None) => debug!("No last known presence record"),
                Err(e) => warn!(error = %e, "Presence bootstrap failed"),
            }
        });
        Ok(())
    }

    async fn on_stop(&mut self, ctx: &FeedContext) {
        self.clear_watch(ctx);
    }

    async fn handle_action(&mut self, action: FeedAction, ctx: &FeedContext) -> Result<FeedActionResult, FeedError> {
        match action {
            FeedAction::Start => {
                self.clear_watch(ctx);
                self.generation += 1;
                self.phase = FeedPhase::Acquiring;
                let generation = self.generation;
                info!(generation, provider = ctx.provider.name(), "Position feed starting");
                tokio::spawn(acquire::run(generation, ctx.clone()).instrument(info_span!("feed", generation)));
                Ok(FeedActionResult::Started { generation })
            }
            FeedAction::Stop => {
                self.clear_watch(ctx);
                self.generation += 1;
                self.phase = FeedPhase::Stopped;
                Ok(FeedActionResult::Done)
            }
            FeedAction::Rename(name) => {
                self.device.rename(&name);
                self.persist(ctx)?;
                Ok(FeedActionResult::Done)
            }
            FeedAction::DetectName => {
                self.device.rename(&default_device_name());
                self.persist(ctx)?;
                Ok(FeedActionResult::Done)
            }

            FeedAction::Fix { generation, point } => {
                if !self.is_current(generation) {
                    return Ok(FeedActionResult::Applied(false));
                }
                self.update_position(point, ctx);
                Ok(FeedActionResult::Applied(true))
            }
            FeedAction::Fault { generation, fault } => {
                if !self.is_current(generation) {
                    return Ok(FeedActionResult::Applied(false));
                }
                self.record_fault(fault, ctx).await;
                Ok(FeedActionResult::Applied(true))
            }
            FeedAction::Watching { generation, id } => {
                if !self.is_current(generation) {
                    ctx.provider.clear_watch(id);
                    return Ok(FeedActionResult::Applied(false));
                }
                self.clear_watch(ctx);
                self.watch = Some(id);
                self.phase = FeedPhase::Watching;
                Ok(FeedActionResult::Applied(true))
            }
            FeedAction::WatchFailed { generation, fault } => {
                if !self.is_current(generation) {
                    return Ok(FeedActionResult::Applied(false));
                }
                if self.fault.as_ref() == Some(&fault) {
                    warn!(%fault, "Watch not installed");
                } else {
                    self.record_fault(fault, ctx).await;
                }
                self.phase = FeedPhase::Unavailable;
                Ok(FeedActionResult::Applied(true))
            }
            FeedAction::MergeRemote(remote) => {
                self.merge(&remote, ctx);
                Ok(FeedActionResult::Done)
            }
            FeedAction::Bootstrap(remote) => {
                self.merge(&remote, ctx);
                if self.self_position.is_none() {
                    self.self_position = remote.location.and_then(|p| p.validate().ok());
                }
                Ok(FeedActionResult::Done)
            }
        }
    }
}
