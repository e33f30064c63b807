//! Coordinate Resolver: turns user text into a [`Point`].
//!
//! A literal `lat,lng` pair is parsed directly and never reaches the geocoder.
//! Anything else is handed to the geocoder verbatim and its best match is used.
//! Ranges are not checked here; the trace session validates points before routing.

use crate::model::Point;
use crate::services::{Geocoder, ServiceError};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::{debug, instrument};

static LITERAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$").expect("literal pair pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("location not found: {0}")]
    NotFound(String),

    #[error("geocoder unreachable: {0}")]
    Transport(String),

    /// The geocoder answered, but its result could not be read as coordinates.
    #[error("geocoder response unreadable: {0}")]
    BadResponse(String),
}

impl From<ServiceError> for ResolveError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Decode(detail) => ResolveError::BadResponse(detail),
            other => ResolveError::Transport(other.to_string()),
        }
    }
}

/// Parses `"<number>,<number>"` into a point, or `None` if the text is not a literal pair.
pub fn parse_literal(text: &str) -> Option<Point> {
    let caps = LITERAL_PAIR.captures(text)?;
    let lat = caps[1].parse().ok()?;
    let lng = caps[2].parse().ok()?;
    Some(Point::new(lat, lng))
}

#[derive(Clone)]
pub struct CoordinateResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, text: &str) -> Result<Point, ResolveError> {
        if let Some(point) = parse_literal(text) {
            debug!(%point, "literal coordinates");
            return Ok(point);
        }
        self.geocoder
            .lookup(text)
            .await?
            .ok_or_else(|| ResolveError::NotFound(text.to_string()))
    }
}
