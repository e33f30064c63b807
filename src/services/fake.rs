//! In-memory collaborators.
//!
//! Each double records what it was asked and answers from a script, so tests can drive
//! the actors without a network, a GPS or a screen.

use super::error::ServiceError;
use super::location::{LocationProvider, WatchSubscription};
use super::surface::{Cue, FeedbackCues, MarkerSlot, RenderSurface};
use super::{Geocoder, PresenceService, RoutingService};
use crate::model::{
    Accuracy, Bounds, LocationFault, Point, PresenceUpdate, RemoteDevice, RouteAnalysis, RouteGeometry,
    RouteRequest, RouteResponse, WatchId,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Builds a routing response with the given path and analysis.
pub fn route_response(path: &[Point], steps: &[&str], paths_analyzed: u64, algorithm: &str) -> RouteResponse {
    RouteResponse {
        route: RouteGeometry {
            coordinates: path.iter().map(|p| [p.lat, p.lng]).collect(),
            distance: 1000.0,
            duration: 60.0,
        },
        analysis: RouteAnalysis {
            steps: steps.iter().map(|s| s.to_string()).collect(),
            paths_analyzed,
            algorithm: algorithm.to_string(),
        },
    }
}

// =============================================================================
// GEOCODER
// =============================================================================

#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Point>,
    failure: Option<ServiceError>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, query: &str, point: Point) -> Self {
        self.places.insert(query.to_string(), point);
        self
    }

    /// Every lookup fails with `error`.
    pub fn failing(mut self, error: ServiceError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn lookup(&self, query: &str) -> Result<Option<Point>, ServiceError> {
        locked(&self.calls).push(query.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.places.get(query).copied())
    }
}

// =============================================================================
// ROUTING
// =============================================================================

struct ScriptedRoute {
    delay: Duration,
    result: Result<RouteResponse, ServiceError>,
}

/// Answers route calls in order from a script; unscripted calls fail.
#[derive(Default)]
pub struct FakeRouting {
    script: Mutex<VecDeque<ScriptedRoute>>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl FakeRouting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, result: Result<RouteResponse, ServiceError>) {
        self.respond_after(Duration::ZERO, result);
    }

    pub fn respond_after(&self, delay: Duration, result: Result<RouteResponse, ServiceError>) {
        locked(&self.script).push_back(ScriptedRoute { delay, result });
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        locked(&self.requests).clone()
    }
}

#[async_trait]
impl RoutingService for FakeRouting {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError> {
        locked(&self.requests).push(request.clone());
        let scripted = locked(&self.script).pop_front();
        let Some(scripted) = scripted else {
            return Err(ServiceError::Transport("no scripted response".to_string()));
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result
    }
}

// =============================================================================
// PRESENCE
// =============================================================================

#[derive(Default)]
pub struct FakePresence {
    uploads: Mutex<Vec<PresenceUpdate>>,
    reply: Mutex<Option<RemoteDevice>>,
    last_known: Mutex<Option<RemoteDevice>>,
    failing: AtomicBool,
}

impl FakePresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record returned by every successful upload.
    pub fn reply_with(&self, remote: RemoteDevice) {
        *locked(&self.reply) = Some(remote);
    }

    /// Record returned by the bootstrap fetch.
    pub fn last_known(&self, remote: RemoteDevice) {
        *locked(&self.last_known) = Some(remote);
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<PresenceUpdate> {
        locked(&self.uploads).clone()
    }
}

#[async_trait]
impl PresenceService for FakePresence {
    async fn upload(&self, update: &PresenceUpdate) -> Result<Option<RemoteDevice>, ServiceError> {
        locked(&self.uploads).push(update.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("presence offline".to_string()));
        }
        Ok(locked(&self.reply).clone())
    }

    async fn fetch(&self, _device_id: &str) -> Result<Option<RemoteDevice>, ServiceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("presence offline".to_string()));
        }
        Ok(locked(&self.last_known).clone())
    }
}

// =============================================================================
// LOCATION
// =============================================================================

/// Outcome of one scripted `current_position` call.
#[derive(Debug, Clone)]
pub enum FixScript {
    Fix(Point),
    Fail(LocationFault),
    /// Never answers; the caller's timeout has to fire.
    Hang,
}

/// A location provider driven by the test.
pub struct ScriptedLocationProvider {
    available: bool,
    permission: Mutex<Result<(), LocationFault>>,
    fixes: Mutex<VecDeque<FixScript>>,
    fix_calls: Mutex<Vec<(Accuracy, Duration)>>,
    next_watch: AtomicU64,
    watches: Mutex<HashMap<WatchId, mpsc::UnboundedSender<Result<Point, LocationFault>>>>,
    cleared: Mutex<Vec<WatchId>>,
}

impl Default for ScriptedLocationProvider {
    fn default() -> Self {
        Self {
            available: true,
            permission: Mutex::new(Ok(())),
            fixes: Mutex::new(VecDeque::new()),
            fix_calls: Mutex::new(Vec::new()),
            next_watch: AtomicU64::new(1),
            watches: Mutex::new(HashMap::new()),
            cleared: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedLocationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn deny_permission(&self, detail: &str) {
        self.fail_permission(LocationFault::permission_denied(detail));
    }

    /// Makes the permission request fail with an arbitrary fault.
    pub fn fail_permission(&self, fault: LocationFault) {
        *locked(&self.permission) = Err(fault);
    }

    /// Queues the answer to the next `current_position` call. Unscripted calls fail as unavailable.
    pub fn push_fix(&self, script: FixScript) {
        locked(&self.fixes).push_back(script);
    }

    /// Delivers an event to every installed watch.
    pub fn emit(&self, event: Result<Point, LocationFault>) {
        for sender in locked(&self.watches).values() {
            let _ = sender.send(event.clone());
        }
    }

    pub fn active_watches(&self) -> usize {
        locked(&self.watches).len()
    }

    pub fn cleared_watches(&self) -> Vec<WatchId> {
        locked(&self.cleared).clone()
    }

    pub fn fix_calls(&self) -> Vec<(Accuracy, Duration)> {
        locked(&self.fix_calls).clone()
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocationProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_permission(&self) -> Result<(), LocationFault> {
        locked(&self.permission).clone()
    }

    async fn current_position(&self, accuracy: Accuracy, timeout: Duration) -> Result<Point, LocationFault> {
        locked(&self.fix_calls).push((accuracy, timeout));
        let script = locked(&self.fixes).pop_front();
        match script {
            Some(FixScript::Fix(point)) => Ok(point),
            Some(FixScript::Fail(fault)) => Err(fault),
            Some(FixScript::Hang) => std::future::pending().await,
            None => Err(LocationFault::unavailable("no scripted fix")),
        }
    }

    async fn watch_position(&self, _accuracy: Accuracy) -> Result<WatchSubscription, LocationFault> {
        let id = WatchId(self.next_watch.fetch_add(1, Ordering::SeqCst));
        let (sender, events) = mpsc::unbounded_channel();
        locked(&self.watches).insert(id, sender);
        Ok(WatchSubscription { id, events })
    }

    fn clear_watch(&self, id: WatchId) {
        locked(&self.watches).remove(&id);
        locked(&self.cleared).push(id);
    }
}

// =============================================================================
// SURFACE & CUES
// =============================================================================

/// One command received by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Marker(MarkerSlot, Point),
    Path { points: Vec<Point>, incremental: bool },
    ClearPath,
    FitView(Bounds),
    Log(String),
    ClearLog,
    HackSequence(bool),
}

#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    log_times: Mutex<Vec<(Instant, String)>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        locked(&self.events).clone()
    }

    /// Every log line with the (tokio) instant it arrived.
    pub fn log_times(&self) -> Vec<(Instant, String)> {
        locked(&self.log_times).clone()
    }

    fn push(&self, event: SurfaceEvent) {
        locked(&self.events).push(event);
    }
}

impl RenderSurface for RecordingSurface {
    fn set_marker(&self, slot: MarkerSlot, point: Point) {
        self.push(SurfaceEvent::Marker(slot, point));
    }

    fn draw_path(&self, path: &[Point], incremental: bool) {
        self.push(SurfaceEvent::Path {
            points: path.to_vec(),
            incremental,
        });
    }

    fn clear_path(&self) {
        self.push(SurfaceEvent::ClearPath);
    }

    fn fit_view(&self, bounds: Bounds) {
        self.push(SurfaceEvent::FitView(bounds));
    }

    fn log_line(&self, line: &str) {
        locked(&self.log_times).push((Instant::now(), line.to_string()));
        self.push(SurfaceEvent::Log(line.to_string()));
    }

    fn clear_log(&self) {
        self.push(SurfaceEvent::ClearLog);
    }

    fn set_hack_sequence(&self, active: bool) {
        self.push(SurfaceEvent::HackSequence(active));
    }
}

#[derive(Default)]
pub struct RecordingCues {
    played: Mutex<Vec<Cue>>,
}

impl RecordingCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Cue> {
        locked(&self.played).clone()
    }
}

impl FeedbackCues for RecordingCues {
    fn play(&self, cue: Cue) {
        locked(&self.played).push(cue);
    }
}
