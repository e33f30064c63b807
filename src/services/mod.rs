//! External collaborators, each behind a trait.
//!
//! The actors only ever see these traits through their injected contexts; production
//! wiring uses [`HttpApi`], [`NominatimGeocoder`], [`JsonFileStore`] and friends, tests
//! use the in-memory doubles in [`fake`].

pub mod device_store;
pub mod error;
pub mod fake;
pub mod geocode;
pub mod http;
pub mod location;
pub mod surface;

pub use device_store::*;
pub use error::ServiceError;
pub use geocode::NominatimGeocoder;
pub use http::HttpApi;
pub use location::*;
pub use surface::*;

use crate::model::{Point, PresenceUpdate, RemoteDevice, RouteRequest, RouteResponse};
use async_trait::async_trait;

/// The remote routing call, `POST /api/route`.
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError>;
}

/// Free-text lookup returning the best match, if any.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<Point>, ServiceError>;
}

/// The presence endpoint recording this device's latest profile and location.
#[async_trait]
pub trait PresenceService: Send + Sync {
    /// `POST /api/me`; returns the canonical record when the service sends one.
    async fn upload(&self, update: &PresenceUpdate) -> Result<Option<RemoteDevice>, ServiceError>;

    /// `GET /api/me?deviceId=`; the last known record for this device.
    async fn fetch(&self, device_id: &str) -> Result<Option<RemoteDevice>, ServiceError>;
}
