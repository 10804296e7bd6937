use serde::{Deserialize, Serialize};

/// Namespace/name pair shared by outbound directives and inbound gadget events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub namespace: String,
    pub name: String,
}

/// Reference to a gadget endpoint inside a directive or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRef {
    #[serde(rename = "endpointId")]
    pub endpoint_id: String,
}

/// A gadget reported by the discovery API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub endpoint_id: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

impl Endpoint {
    pub fn new(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            friendly_name: None,
        }
    }
}

/// Credentials the platform hands the skill for calling back into its APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAccess {
    #[serde(default)]
    pub api_endpoint: String,
    #[serde(default)]
    pub api_access_token: String,
}
