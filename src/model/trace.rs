use super::point::{Point, PointSource, Profile};
use serde::{Deserialize, Serialize};

/// One request to trace a path, consumed exactly once by the trace session.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRequest {
    pub origin: PointSource,
    pub destination: PointSource,
    pub profile: Profile,
}

/// Where a trace currently is. A failed trace goes straight back to `Idle`; how it
/// ended is kept in [`TraceOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceState {
    #[default]
    Idle,
    Resolving,
    Requesting,
    StreamingLog,
}

/// How the most recent finished trace ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    Completed { seq: u64 },
    Failed { seq: u64, message: String },
}

/// Body of `POST /api/route`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    pub origin: Point,
    pub destination: Point,
    pub profile: Profile,
}

/// Successful response of `POST /api/route`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteResponse {
    pub route: RouteGeometry,
    pub analysis: RouteAnalysis,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteGeometry {
    /// `[lat, lng]` pairs in path order.
    pub coordinates: Vec<[f64; 2]>,
    pub distance: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAnalysis {
    #[serde(default)]
    pub steps: Vec<String>,
    pub paths_analyzed: u64,
    pub algorithm: String,
}

/// A computed path plus the service's analysis narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceResult {
    pub path: Vec<Point>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub analysis_steps: Vec<String>,
    pub paths_analyzed: u64,
    pub algorithm: String,
}

impl From<RouteResponse> for TraceResult {
    fn from(response: RouteResponse) -> Self {
        Self {
            path: response
                .route
                .coordinates
                .into_iter()
                .map(|[lat, lng]| Point::new(lat, lng))
                .collect(),
            distance_meters: response.route.distance,
            duration_seconds: response.route.duration,
            analysis_steps: response.analysis.steps,
            paths_analyzed: response.analysis.paths_analyzed,
            algorithm: response.analysis.algorithm,
        }
    }
}
