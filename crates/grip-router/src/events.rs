//! Turns gadget sensor events into speech.

use crate::speech;
use grip_core::envelope::InboundEvent;
use grip_core::Response;
use serde_json::Value;

/// Event names the gadget emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GadgetEvent {
    Proximity,
    Sentry,
    Speech,
    Other(String),
}

impl GadgetEvent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Proximity" => GadgetEvent::Proximity,
            "Sentry" => GadgetEvent::Sentry,
            "Speech" => GadgetEvent::Speech,
            other => GadgetEvent::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventInterpreter {
    /// Readings strictly below this raise the intruder alert.
    pub alert_distance: i64,
}

impl EventInterpreter {
    pub fn new(alert_distance: i64) -> Self {
        Self { alert_distance }
    }

    pub fn interpret(&self, event: &InboundEvent) -> Response {
        let kind = GadgetEvent::from_name(&event.header.name);
        tracing::debug!(?kind, payload = %event.payload, "interpreting gadget event");

        match kind {
            GadgetEvent::Proximity => match distance(&event.payload) {
                Some(d) if d < self.alert_distance => Response::builder()
                    .speak(speech::INTRUDER)
                    .reprompt(speech::CLOSE_CALL)
                    .build(),
                _ => Response::silent(),
            },
            GadgetEvent::Sentry => {
                if event.payload.get("fire").is_some() {
                    Response::builder().speak(speech::THREAT_ELIMINATED).build()
                } else {
                    Response::silent()
                }
            }
            GadgetEvent::Speech => match event.payload.get("speechOut").and_then(Value::as_str) {
                Some(text) => Response::builder().speak(text).build(),
                None => Response::silent(),
            },
            GadgetEvent::Other(_) => Response::builder()
                .speak(speech::EVENT_NOT_RECOGNIZED)
                .build(),
        }
    }
}

impl Default for EventInterpreter {
    fn default() -> Self {
        Self::new(10)
    }
}

fn distance(payload: &Value) -> Option<i64> {
    match payload.get("distance")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64),
        _ => None,
    }
}
