//! Gadget discovery against the platform's endpoint API.

use async_trait::async_trait;
use grip_core::config::DiscoveryConfig;
use grip_core::types::{ApiAccess, Endpoint};
use grip_core::{GripError, Result};
use grip_router::EndpointDiscovery;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct EndpointList {
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

/// Calls `GET {apiEndpoint}/v1/endpoints` with the request's bearer token.
pub struct HttpDiscovery {
    http_client: reqwest::Client,
}

impl HttpDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GripError::Discovery(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }

    pub(crate) fn endpoints_url(api_endpoint: &str) -> String {
        format!("{}/v1/endpoints", api_endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl EndpointDiscovery for HttpDiscovery {
    async fn list_connected_endpoints(&self, access: &ApiAccess) -> Result<Vec<Endpoint>> {
        if access.api_endpoint.is_empty() {
            return Err(GripError::Discovery("request carried no API endpoint".into()));
        }
        let url = Self::endpoints_url(&access.api_endpoint);
        tracing::debug!(%url, "listing connected endpoints");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&access.api_access_token)
            .send()
            .await
            .map_err(|e| GripError::Discovery(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, "endpoint API returned an error");
            return Err(GripError::Discovery(format!("endpoint API returned {}", status)));
        }

        let list: EndpointList = response
            .json()
            .await
            .map_err(|e| GripError::Discovery(format!("invalid endpoint list: {}", e)))?;
        tracing::debug!(count = list.endpoints.len(), "endpoints listed");
        Ok(list.endpoints)
    }
}
