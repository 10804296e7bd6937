//! Request and response envelopes exchanged with the voice platform.

use crate::directive::Directive;
use crate::response::Response;
use crate::types::{ApiAccess, EndpointRef, Header};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const ENVELOPE_VERSION: &str = "1.0";

fn default_version() -> String {
    ENVELOPE_VERSION.into()
}

/// Inbound envelope posted by the platform for every request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub session: SessionInfo,
    #[serde(default)]
    pub context: RequestContext,
    pub request: Request,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub new: bool,
    /// Attribute bag echoed back from the previous response.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    #[serde(rename = "System", default)]
    pub system: ApiAccess,
}

/// A single slot filled by the intent layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: &str, value: impl Into<String>) -> Self {
        self.slots.insert(
            name.to_string(),
            Slot {
                name: name.to_string(),
                value: Some(value.into()),
            },
        );
        self
    }

    /// Slot value, treating blank values as absent.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|s| s.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// An event sent by the gadget through the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub header: Header,
    #[serde(default)]
    pub endpoint: Option<EndpointRef>,
    #[serde(default)]
    pub payload: Value,
}

impl InboundEvent {
    pub fn endpoint_id(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|e| e.endpoint_id.as_str())
    }
}

/// What kind of request arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    Launch,
    Intent(Intent),
    EventsReceived {
        token: String,
        events: Vec<InboundEvent>,
    },
    Expired {
        token: String,
        expiration_payload: Value,
    },
    SessionEnded {
        reason: Option<String>,
    },
    /// Anything the skill has no vocabulary for. Keeps the raw `type`.
    Unknown {
        request_type: String,
    },
}

impl RequestKind {
    /// Platform name of the request type.
    pub fn type_name(&self) -> &str {
        match self {
            RequestKind::Launch => "LaunchRequest",
            RequestKind::Intent(_) => "IntentRequest",
            RequestKind::EventsReceived { .. } => "CustomInterfaceController.EventsReceived",
            RequestKind::Expired { .. } => "CustomInterfaceController.Expired",
            RequestKind::SessionEnded { .. } => "SessionEndedRequest",
            RequestKind::Unknown { request_type } => request_type,
        }
    }
}

/// A parsed request. Deserialization never fails on an unfamiliar `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Request {
    pub request_id: String,
    pub kind: RequestKind,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownRequest {
    LaunchRequest {},
    IntentRequest {
        intent: Intent,
    },
    #[serde(rename = "CustomInterfaceController.EventsReceived")]
    EventsReceived {
        #[serde(default)]
        token: String,
        #[serde(default)]
        events: Vec<InboundEvent>,
    },
    #[serde(rename = "CustomInterfaceController.Expired", rename_all = "camelCase")]
    Expired {
        #[serde(default)]
        token: String,
        #[serde(default)]
        expiration_payload: Value,
    },
    SessionEndedRequest {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl From<KnownRequest> for RequestKind {
    fn from(known: KnownRequest) -> Self {
        match known {
            KnownRequest::LaunchRequest {} => RequestKind::Launch,
            KnownRequest::IntentRequest { intent } => RequestKind::Intent(intent),
            KnownRequest::EventsReceived { token, events } => {
                RequestKind::EventsReceived { token, events }
            }
            KnownRequest::Expired {
                token,
                expiration_payload,
            } => RequestKind::Expired {
                token,
                expiration_payload,
            },
            KnownRequest::SessionEndedRequest { reason } => RequestKind::SessionEnded { reason },
        }
    }
}

impl From<Value> for Request {
    fn from(value: Value) -> Self {
        let request_id = value
            .get("requestId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let request_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let kind = match serde_json::from_value::<KnownRequest>(value) {
            Ok(known) => known.into(),
            Err(err) => {
                tracing::debug!(%request_type, error = %err, "unrecognized request shape");
                RequestKind::Unknown { request_type }
            }
        };

        Request { request_id, kind }
    }
}

impl Request {
    pub fn new(request_id: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            request_id: request_id.into(),
            kind,
        }
    }

    pub fn launch(request_id: impl Into<String>) -> Self {
        Self::new(request_id, RequestKind::Launch)
    }

    pub fn intent(request_id: impl Into<String>, intent: Intent) -> Self {
        Self::new(request_id, RequestKind::Intent(intent))
    }

    pub fn intent_name(&self) -> Option<&str> {
        match &self.kind {
            RequestKind::Intent(intent) => Some(intent.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub ssml: String,
}

impl OutputSpeech {
    pub fn ssml(text: &str) -> Self {
        Self {
            speech_type: "SSML".into(),
            ssml: format!("<speak>{}</speak>", escape_ssml(text)),
        }
    }
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default)]
    pub directives: Vec<Directive>,
    pub should_end_session: bool,
}

impl From<Response> for ResponseBody {
    fn from(response: Response) -> Self {
        Self {
            output_speech: response.speech.as_deref().map(OutputSpeech::ssml),
            reprompt: response.reprompt.as_deref().map(|text| Reprompt {
                output_speech: OutputSpeech::ssml(text),
            }),
            directives: response.directives,
            should_end_session: response.should_end_session,
        }
    }
}

/// Outbound envelope returned to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: Map<String, Value>,
    pub response: ResponseBody,
}

impl ResponseEnvelope {
    pub fn new(response: Response, session_attributes: Map<String, Value>) -> Self {
        Self {
            version: ENVELOPE_VERSION.into(),
            session_attributes,
            response: response.into(),
        }
    }
}
