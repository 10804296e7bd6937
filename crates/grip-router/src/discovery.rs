//! Gadget discovery port.

use async_trait::async_trait;
use grip_core::types::{ApiAccess, Endpoint};
use grip_core::Result;

/// Lists the gadgets connected to the voice device that sent the request.
#[async_trait]
pub trait EndpointDiscovery: Send + Sync {
    async fn list_connected_endpoints(&self, access: &ApiAccess) -> Result<Vec<Endpoint>>;
}

/// Fixed endpoint list, for tests and local runs without the platform API.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    endpoints: Vec<Endpoint>,
}

impl StaticDiscovery {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(endpoint_id: impl Into<String>) -> Self {
        Self::new(vec![Endpoint::new(endpoint_id)])
    }
}

#[async_trait]
impl EndpointDiscovery for StaticDiscovery {
    async fn list_connected_endpoints(&self, _access: &ApiAccess) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }
}
