//! Nominatim-compatible free-text geocoder.

use super::error::ServiceError;
use super::Geocoder;
use crate::model::Point;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("neon-trace")
            .build()?;
        Ok(Self {
            client,
            search_url: search_url.into(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<Option<Point>, ServiceError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .header(reqwest::header::ACCEPT_LANGUAGE, "en")
            .send()
            .await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "geocoder returned no result");
            return Ok(None);
        }
        let places: Vec<Place> = response.json().await?;
        let Some(first) = places.into_iter().next() else {
            return Ok(None);
        };
        let lat = first.lat.parse::<f64>().map_err(|e| ServiceError::Decode(e.to_string()))?;
        let lng = first.lon.parse::<f64>().map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(Some(Point::new(lat, lng)))
    }
}
