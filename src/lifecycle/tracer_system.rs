use crate::clients::{FeedClient, TraceClient};
use crate::config::Config;
use crate::console::Console;
use crate::feed_actor::{self, FeedContext};
use crate::resolver::CoordinateResolver;
use crate::services::{
    load_or_create, select_provider, ConfiguredLocationProvider, DeviceStore, FeedbackCues, Geocoder, HttpApi,
    JsonFileStore, LocationProvider, LoggedCues, NominatimGeocoder, PresenceService, RenderSurface, RoutingService,
    ServiceError, StoreError, TerminalSurface, UnavailableLocationProvider,
};
use crate::trace_actor::{self, TraceContext};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// Every external collaborator the actors talk to.
#[derive(Clone)]
pub struct Services {
    pub geocoder: Arc<dyn Geocoder>,
    pub routing: Arc<dyn RoutingService>,
    pub presence: Arc<dyn PresenceService>,
    pub location: Arc<dyn LocationProvider>,
    pub store: Arc<dyn DeviceStore>,
    pub surface: Arc<dyn RenderSurface>,
    pub cues: Arc<dyn FeedbackCues>,
}

impl Services {
    /// Production collaborators: HTTP services, the JSON device store and the terminal.
    pub fn from_config(config: &Config) -> Result<Self, SystemError> {
        let api = Arc::new(HttpApi::new(&config.api_base, config.http_timeout)?);
        let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder_url, config.http_timeout)?);
        let store = match &config.device_file {
            Some(path) => JsonFileStore::new(path),
            None => JsonFileStore::default_location()?,
        };
        let location = select_provider(
            Some(Arc::new(ConfiguredLocationProvider::new(config.fixed_location))),
            Arc::new(UnavailableLocationProvider),
        );
        Ok(Self {
            geocoder,
            routing: api.clone(),
            presence: api,
            location,
            store: Arc::new(store),
            surface: Arc::new(TerminalSurface),
            cues: Arc::new(LoggedCues::new(config.mute)),
        })
    }
}

/// The runtime that owns the two actors of the map client.
///
/// `TracerSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping both actors
/// - **Dependency Wiring**: The trace session reads the feed's live position, the feed
///   writes `geo_error` lines into the trace session's log
///
/// Each actor only holds weak handles to itself and to the other actor, so dropping the
/// public clients is enough to stop both.
///
/// # Example
///
/// ```ignore
/// let system = TracerSystem::new(services, &Config::default())?;
/// system.feed_client.start().await?;
/// system.trace_client.trigger_from_fields().await?;
/// system.shutdown().await?;
/// ```
pub struct TracerSystem {
    /// Client for interacting with the trace session actor
    pub trace_client: TraceClient,

    /// Client for interacting with the position feed actor
    pub feed_client: FeedClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TracerSystem {
    /// Loads (or creates) the device profile, spawns both actors and wires their contexts.
    pub fn new(services: Services, config: &Config) -> Result<Self, SystemError> {
        let device = load_or_create(services.store.as_ref())?;
        info!(device_id = %device.device_id, device_name = %device.device_name, "Device profile loaded");

        // 1. Create actors
        let (trace_actor, trace_client) = trace_actor::new();
        let (feed_actor, feed_client) = feed_actor::new(device);

        // 2. Start actors with injected context
        let trace_context = TraceContext {
            resolver: CoordinateResolver::new(services.geocoder),
            routing: services.routing,
            surface: services.surface,
            cues: services.cues,
            self_position: Some(Arc::new(feed_client.downgrade())),
            pacing: config.pacing,
            hack_duration: config.hack_duration,
            this: trace_client.downgrade(),
        };
        let feed_context = FeedContext {
            provider: services.location,
            presence: services.presence,
            store: services.store,
            log: Some(Arc::new(trace_client.downgrade())),
            high_accuracy_timeout: config.high_accuracy_timeout,
            low_accuracy_timeout: config.low_accuracy_timeout,
            this: feed_client.downgrade(),
        };

        let trace_handle = tokio::spawn(trace_actor.run(trace_context));
        let feed_handle = tokio::spawn(feed_actor.run(feed_context));

        Ok(Self {
            trace_client,
            feed_client,
            handles: vec![trace_handle, feed_handle],
        })
    }

    /// Builds the system with the production collaborators.
    pub fn from_config(config: &Config) -> Result<Self, SystemError> {
        Self::new(Services::from_config(config)?, config)
    }

    pub fn console(&self) -> Console {
        Console::new(self.trace_client.clone())
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes the actors' channels; each actor runs its `on_stop`
    /// hook (the feed clears its watch) and exits. Returns an error if an actor task
    /// panicked.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.trace_client);
        drop(self.feed_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
