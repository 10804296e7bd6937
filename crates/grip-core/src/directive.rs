//! Outbound directive payloads.
//!
//! Every builder here is pure: the same arguments always produce the same
//! directive, and nothing is sent until the response is returned.

use crate::error::{GripError, Result};
use crate::types::{EndpointRef, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Command sent to the gadget, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlPayload {
    Move {
        direction: String,
        duration: String,
        speed: u8,
    },
    Come {
        speed: u8,
    },
    Bring {
        speed: u8,
    },
    Take {
        speed: u8,
    },
    Command {
        command: String,
        speed: u8,
    },
}

impl ControlPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlPayload::Move { .. } => "move",
            ControlPayload::Come { .. } => "come",
            ControlPayload::Bring { .. } => "bring",
            ControlPayload::Take { .. } => "take",
            ControlPayload::Command { .. } => "command",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub filter_expression: Value,
    pub filter_match_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    pub duration_in_milliseconds: u64,
    pub expiration_payload: Value,
}

/// Extra settings for [`build_start_timer`].
#[derive(Debug, Clone, Default)]
pub struct StartTimerOptions {
    /// Only forward gadget events from this namespace. `None` forwards everything.
    pub namespace: Option<String>,
    /// Echoed back in the expiry notification.
    pub expiration_payload: Value,
}

impl StartTimerOptions {
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            expiration_payload: Value::Object(Default::default()),
        }
    }
}

/// One outbound instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "CustomInterfaceController.SendDirective")]
    SendDirective {
        header: Header,
        endpoint: EndpointRef,
        payload: ControlPayload,
    },
    #[serde(rename = "CustomInterfaceController.StartEventHandler", rename_all = "camelCase")]
    StartEventHandler {
        token: String,
        event_filter: EventFilter,
        expiration: Expiration,
    },
    #[serde(rename = "CustomInterfaceController.StopEventHandler")]
    StopEventHandler { token: String },
}

impl Directive {
    /// Correlation token for event-handler directives.
    pub fn token(&self) -> Option<&str> {
        match self {
            Directive::StartEventHandler { token, .. } | Directive::StopEventHandler { token } => {
                Some(token)
            }
            Directive::SendDirective { .. } => None,
        }
    }

    pub fn control_payload(&self) -> Option<&ControlPayload> {
        match self {
            Directive::SendDirective { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_start_timer(&self) -> bool {
        matches!(self, Directive::StartEventHandler { .. })
    }
}

/// Build a control directive addressed to a gadget.
///
/// Fails with [`GripError::NoEndpoint`] when `endpoint_id` is empty, which is
/// what an unlaunched session carries.
pub fn build_control_directive(
    endpoint_id: &str,
    namespace: &str,
    name: &str,
    payload: ControlPayload,
) -> Result<Directive> {
    if endpoint_id.is_empty() {
        return Err(GripError::NoEndpoint);
    }
    Ok(Directive::SendDirective {
        header: Header {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        endpoint: EndpointRef {
            endpoint_id: endpoint_id.to_string(),
        },
        payload,
    })
}

/// Build a directive that starts the event handler countdown.
pub fn build_start_timer(token: &str, duration_ms: u64, options: StartTimerOptions) -> Directive {
    let conditions: Vec<Value> = options
        .namespace
        .iter()
        .map(|ns| json!({ "==": [{ "var": "header.namespace" }, ns] }))
        .collect();

    Directive::StartEventHandler {
        token: token.to_string(),
        event_filter: EventFilter {
            filter_expression: json!({ "and": conditions }),
            filter_match_action: "SEND".into(),
        },
        expiration: Expiration {
            duration_in_milliseconds: duration_ms,
            expiration_payload: options.expiration_payload,
        },
    }
}

/// Build a directive that stops the event handler bound to `token`.
pub fn build_stop_timer(token: &str) -> Directive {
    Directive::StopEventHandler {
        token: token.to_string(),
    }
}
