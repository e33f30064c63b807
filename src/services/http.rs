//! `reqwest`-backed client for the routing and presence endpoints.

use super::error::{error_detail, ServiceError};
use super::{PresenceService, RoutingService};
use crate::model::{PresenceEnvelope, PresenceUpdate, RemoteDevice, RouteRequest, RouteResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for `POST /api/route`, `POST /api/me` and `GET /api/me`.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn read_error(response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ServiceError::Status {
            status,
            body: error_detail(&body),
        }
    }
}

#[async_trait]
impl RoutingService for HttpApi {
    #[instrument(skip(self), fields(profile = %request.profile))]
    async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, ServiceError> {
        debug!(?request, "route called");
        let response = self.client.post(self.url("/api/route")).json(request).send().await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        Ok(response.json::<RouteResponse>().await?)
    }
}

#[async_trait]
impl PresenceService for HttpApi {
    #[instrument(skip(self, update), fields(device_id = %update.device_id))]
    async fn upload(&self, update: &PresenceUpdate) -> Result<Option<RemoteDevice>, ServiceError> {
        let response = self.client.post(self.url("/api/me")).json(update).send().await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        Ok(response.json::<PresenceEnvelope>().await?.me)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, device_id: &str) -> Result<Option<RemoteDevice>, ServiceError> {
        let response = self
            .client
            .get(self.url("/api/me"))
            .query(&[("deviceId", device_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        Ok(response.json::<PresenceEnvelope>().await?.me)
    }
}
