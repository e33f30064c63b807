#![allow(dead_code)]

use neon_trace::clients::{ActorClient, FeedClient, TraceClient};
use neon_trace::config::Config;
use neon_trace::feed_actor::PositionFeed;
use neon_trace::lifecycle::{Services, TracerSystem};
use neon_trace::model::{DeviceProfile, Point, RouteResponse, TraceOutcome};
use neon_trace::services::fake::{
    route_response, FakeGeocoder, FakePresence, FakeRouting, RecordingCues, RecordingSurface, ScriptedLocationProvider,
};
use neon_trace::services::{LocationProvider, MemoryStore};
use neon_trace::trace_actor::TraceSession;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub const NEW_YORK: Point = Point { lat: 40.7, lng: -74.0 };
pub const BOSTON: Point = Point { lat: 42.36, lng: -71.06 };

/// A full system wired to in-memory collaborators.
pub struct Harness {
    pub system: TracerSystem,
    pub geocoder: Arc<FakeGeocoder>,
    pub routing: Arc<FakeRouting>,
    pub presence: Arc<FakePresence>,
    pub store: Arc<MemoryStore>,
    pub surface: Arc<RecordingSurface>,
    pub cues: Arc<RecordingCues>,
}

pub struct HarnessBuilder {
    geocoder: FakeGeocoder,
    location: Arc<dyn LocationProvider>,
    presence: Arc<FakePresence>,
    store: Arc<MemoryStore>,
    config: Config,
}

impl HarnessBuilder {
    pub fn geocoder(mut self, geocoder: FakeGeocoder) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    pub fn presence(mut self, presence: Arc<FakePresence>) -> Self {
        self.presence = presence;
        self
    }

    pub fn device(mut self, device: DeviceProfile) -> Self {
        self.store = Arc::new(MemoryStore::with_profile(device));
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Harness {
        let geocoder = Arc::new(self.geocoder);
        let routing = Arc::new(FakeRouting::new());
        let surface = Arc::new(RecordingSurface::new());
        let cues = Arc::new(RecordingCues::new());
        let services = Services {
            geocoder: geocoder.clone(),
            routing: routing.clone(),
            presence: self.presence.clone(),
            location: self.location,
            store: self.store.clone(),
            surface: surface.clone(),
            cues: cues.clone(),
        };
        let system = TracerSystem::new(services, &self.config).expect("system starts");
        Harness {
            system,
            geocoder,
            routing,
            presence: self.presence,
            store: self.store,
            surface,
            cues,
        }
    }
}

pub fn harness() -> HarnessBuilder {
    HarnessBuilder {
        geocoder: FakeGeocoder::new(),
        location: Arc::new(ScriptedLocationProvider::new()),
        presence: Arc::new(FakePresence::new()),
        store: Arc::new(MemoryStore::default()),
        config: Config::default(),
    }
}

impl Harness {
    pub fn trace(&self) -> &TraceClient {
        &self.system.trace_client
    }

    pub fn feed(&self) -> &FeedClient {
        &self.system.feed_client
    }
}

pub fn ok_route(steps: &[&str], paths_analyzed: u64, algorithm: &str) -> RouteResponse {
    route_response(&[NEW_YORK, Point::new(41.5, -72.5), BOSTON], steps, paths_analyzed, algorithm)
}

/// Polls the session until trace `seq` has finished, one way or the other.
pub async fn wait_for_outcome(client: &TraceClient, seq: u64) -> TraceSession {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        let session = client.snapshot().await.expect("trace actor alive");
        let finished = match &session.last_outcome {
            Some(TraceOutcome::Completed { seq: done }) | Some(TraceOutcome::Failed { seq: done, .. }) => *done == seq,
            None => false,
        };
        if finished {
            return session;
        }
        assert!(Instant::now() < deadline, "trace {seq} did not finish: {session:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Polls the feed until `check` holds.
pub async fn wait_for_feed(client: &FeedClient, limit: Duration, check: impl Fn(&PositionFeed) -> bool) -> PositionFeed {
    let deadline = Instant::now() + limit;
    loop {
        let feed = client.snapshot().await.expect("feed actor alive");
        if check(&feed) {
            return feed;
        }
        assert!(Instant::now() < deadline, "feed condition not met: {feed:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Polls a plain condition, typically on one of the fakes.
pub async fn wait_until(limit: Duration, check: impl Fn() -> bool) {
    let deadline = Instant::now() + limit;
    while !check() {
        assert!(Instant::now() < deadline, "condition not met within {limit:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
