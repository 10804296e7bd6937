//! Single entry point for every platform request.

use crate::discovery::EndpointDiscovery;
use crate::events::EventInterpreter;
use crate::route::Route;
use crate::speech;
use crate::timer::EventHandlerTimer;
use grip_core::config::SkillConfig;
use grip_core::envelope::{Request, RequestEnvelope, ResponseEnvelope};
use grip_core::types::ApiAccess;
use grip_core::Response;
use grip_session::{Session, Speed};
use std::sync::Arc;

/// Result of routing one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub route: Route,
    pub response: Response,
    /// Session to persist. Equal to the input when the handler failed.
    pub session: Session,
}

/// Holds no per-conversation state and can be shared across requests.
pub struct Dispatcher {
    pub(crate) discovery: Arc<dyn EndpointDiscovery>,
    pub(crate) timer: EventHandlerTimer,
    pub(crate) interpreter: EventInterpreter,
    pub(crate) namespace: String,
    pub(crate) control_name: String,
    pub(crate) default_speed: Speed,
}

impl Dispatcher {
    pub fn new(config: &SkillConfig, discovery: Arc<dyn EndpointDiscovery>) -> Self {
        Self {
            discovery,
            timer: EventHandlerTimer::from_config(config),
            interpreter: EventInterpreter::new(config.proximity_alert_distance),
            namespace: config.gadget_namespace.clone(),
            control_name: config.control_name.clone(),
            default_speed: Speed::clamped(config.default_speed as i64),
        }
    }

    /// Route an envelope and always produce a well-formed response envelope.
    pub async fn handle(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let session = Session::from_attributes(&envelope.session.attributes);
        let before = session.clone();
        let outcome = self
            .dispatch(&envelope.request, &envelope.context.system, session)
            .await;

        let attributes = if outcome.session == before {
            envelope.session.attributes
        } else {
            outcome.session.to_attributes(envelope.session.attributes)
        };
        ResponseEnvelope::new(outcome.response, attributes)
    }

    /// Pick a route, run it on a copy of `session`, and keep the copy only if
    /// the handler succeeded.
    pub async fn dispatch(&self, request: &Request, access: &ApiAccess, session: Session) -> Outcome {
        let route = Route::select(request, &session);
        tracing::debug!(
            %route,
            request_id = %request.request_id,
            request_type = request.kind.type_name(),
            "routing request"
        );

        let mut working = session.clone();
        match self.respond(route, request, access, &mut working).await {
            Ok(response) => Outcome {
                route,
                response,
                session: working,
            },
            Err(err) => {
                tracing::error!(
                    %route,
                    request_id = %request.request_id,
                    error = %err,
                    "handler failed"
                );
                Outcome {
                    route,
                    response: Response::builder()
                        .speak(speech::APOLOGY)
                        .reprompt(speech::APOLOGY)
                        .build(),
                    session,
                }
            }
        }
    }
}
