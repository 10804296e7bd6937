//! Route actions.

use crate::dispatcher::Dispatcher;
use crate::route::{slots, Route};
use crate::speech;
use crate::timer::ExpiryOutcome;
use grip_core::directive::{build_control_directive, ControlPayload, Directive};
use grip_core::envelope::{InboundEvent, Intent, Request, RequestKind};
use grip_core::types::ApiAccess;
use grip_core::{Response, Result};
use grip_session::{Session, Speed};

const DEFAULT_MOVE_DURATION: &str = "2";

/// Commands that put the robot in sentry mode. Activating it is silent.
const SENTRY_COMMANDS: [&str; 4] = ["sentry", "sentry mode", "guard", "guard mode"];

fn is_sentry(command: &str) -> bool {
    SENTRY_COMMANDS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(command))
}

fn missing_slot(slot: &str) -> Response {
    tracing::debug!(slot, "required slot missing");
    Response::builder()
        .speak(speech::REPEAT)
        .reprompt(speech::REPEAT_AGAIN)
        .build()
}

fn intent_of(request: &Request) -> Option<&Intent> {
    match &request.kind {
        RequestKind::Intent(intent) => Some(intent),
        _ => None,
    }
}

/// Slot value, or `None` when the request carries no such intent slot.
fn slot<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    intent_of(request).and_then(|intent| intent.slot_value(name))
}

impl Dispatcher {
    pub(crate) async fn respond(
        &self,
        route: Route,
        request: &Request,
        access: &ApiAccess,
        session: &mut Session,
    ) -> Result<Response> {
        match route {
            Route::Launch => self.launch(request, access, session).await,
            Route::SetSpeed => Ok(self.set_speed(request, session)),
            Route::SetCommand => self.set_command(request, session),
            Route::Move => self.move_robot(request, session),
            Route::Come => {
                let speed = session.speed_or(self.default_speed);
                let directive = self.send_control(session, ControlPayload::Come { speed: speed.percent() })?;
                Ok(self.confirm(speech::coming(speed), directive))
            }
            Route::Bring => {
                let speed = session.speed_or(self.default_speed);
                let directive = self.send_control(session, ControlPayload::Bring { speed: speed.percent() })?;
                Ok(self.confirm(speech::BRINGING, directive))
            }
            Route::Take => {
                let speed = session.speed_or(self.default_speed);
                let directive = self.send_control(session, ControlPayload::Take { speed: speed.percent() })?;
                Ok(self.confirm(speech::TAKING, directive))
            }
            Route::EventsReceived => Ok(self.events_received(request, session)),
            Route::Expired => Ok(self.expired(request, session)),
            Route::StaleCorrelation => {
                tracing::info!(
                    request_type = request.kind.type_name(),
                    "dropping uncorrelated notification"
                );
                Ok(Response::silent())
            }
            Route::Help => Ok(Response::builder()
                .speak(speech::HELP)
                .reprompt(speech::HELP)
                .build()),
            Route::CancelAndStop => {
                let mut builder = Response::builder().speak(speech::GOODBYE).end_session();
                if let Some(stop) = self.timer.stop(session) {
                    builder = builder.directive(stop);
                }
                session.end();
                Ok(builder.build())
            }
            Route::SessionEnded => {
                if let RequestKind::SessionEnded { reason } = &request.kind {
                    tracing::info!(reason = reason.as_deref().unwrap_or("-"), "session ended");
                }
                session.end();
                Ok(Response::silent())
            }
            Route::Reflector => Ok(reflect(request)),
        }
    }

    async fn launch(&self, request: &Request, access: &ApiAccess, session: &mut Session) -> Result<Response> {
        let endpoints = self.discovery.list_connected_endpoints(access).await?;
        let Some(endpoint) = endpoints.iter().find(|e| !e.endpoint_id.trim().is_empty()) else {
            tracing::warn!("no connected gadget found");
            session.end();
            return Ok(Response::builder().speak(speech::NO_GADGET).end_session().build());
        };

        tracing::info!(
            endpoint_id = %endpoint.endpoint_id,
            connected = endpoints.len(),
            "gadget selected"
        );
        session.begin(endpoint.endpoint_id.as_str());
        let timer = self.timer.start(session, &request.request_id);

        Ok(Response::builder()
            .speak(speech::WELCOME)
            .reprompt(speech::AWAITING)
            .directive(timer)
            .build())
    }

    fn set_speed(&self, request: &Request, session: &mut Session) -> Response {
        let Some(speed) = slot(request, slots::SPEED).and_then(Speed::from_slot) else {
            return missing_slot(slots::SPEED);
        };
        session.speed = Some(speed);
        if session.is_live() {
            session.await_command();
        }
        Response::builder()
            .speak(speech::speed_set(speed))
            .reprompt(speech::AWAITING)
            .build()
    }

    fn set_command(&self, request: &Request, session: &mut Session) -> Result<Response> {
        let Some(command) = slot(request, slots::COMMAND) else {
            return Ok(missing_slot(slots::COMMAND));
        };
        let speed = session.speed_or(self.default_speed);
        let directive = self.send_control(
            session,
            ControlPayload::Command {
                command: command.to_string(),
                speed: speed.percent(),
            },
        )?;

        // Sentry mode is confirmed by the gadget itself, not by voice.
        let text = if is_sentry(command) {
            String::new()
        } else {
            speech::command_activated(command)
        };
        Ok(self.confirm(text, directive))
    }

    fn move_robot(&self, request: &Request, session: &mut Session) -> Result<Response> {
        let Some(direction) = slot(request, slots::DIRECTION) else {
            return Ok(missing_slot(slots::DIRECTION));
        };
        let duration = slot(request, slots::DURATION).unwrap_or(DEFAULT_MOVE_DURATION);
        let speed = session.speed_or(self.default_speed);
        let directive = self.send_control(
            session,
            ControlPayload::Move {
                direction: direction.to_string(),
                duration: duration.to_string(),
                speed: speed.percent(),
            },
        )?;
        Ok(self.confirm(speech::moving(direction, duration, speed), directive))
    }

    fn events_received(&self, request: &Request, session: &mut Session) -> Response {
        let RequestKind::EventsReceived { events, .. } = &request.kind else {
            return Response::silent();
        };
        let Some(event) = events.first() else {
            return Response::silent();
        };
        if !self.event_from_session_gadget(event, session) {
            return Response::silent();
        }
        session.await_command();
        self.interpreter.interpret(event)
    }

    fn event_from_session_gadget(&self, event: &InboundEvent, session: &Session) -> bool {
        if session.endpoint_matches(event.endpoint_id()) {
            return true;
        }
        tracing::info!(
            event = %event.header.name,
            endpoint_id = event.endpoint_id().unwrap_or("-"),
            "dropping event from unexpected endpoint"
        );
        false
    }

    fn expired(&self, request: &Request, session: &mut Session) -> Response {
        match self.timer.on_expired(session, &request.request_id) {
            ExpiryOutcome::Renewed { remaining, directive } => Response::builder()
                .speak(speech::time_remaining(remaining, self.timer.interval_ms))
                .directive(directive)
                .build(),
            ExpiryOutcome::Exhausted => {
                session.end();
                Response::builder()
                    .speak(speech::SESSION_EXPIRED)
                    .end_session()
                    .build()
            }
        }
    }

    fn send_control(&self, session: &mut Session, payload: ControlPayload) -> Result<Directive> {
        let endpoint_id = session.endpoint_id.as_deref().unwrap_or_default();
        let directive = build_control_directive(endpoint_id, &self.namespace, &self.control_name, payload)?;
        session.await_gadget();
        Ok(directive)
    }

    fn confirm(&self, text: impl Into<String>, directive: Directive) -> Response {
        Response::builder()
            .speak(text)
            .reprompt(speech::AWAITING)
            .directive(directive)
            .build()
    }
}

fn reflect(request: &Request) -> Response {
    let text = match request.intent_name() {
        Some(name) => speech::intent_reflected(name),
        None => speech::request_not_handled(request.kind.type_name()),
    };
    tracing::info!(request_type = request.kind.type_name(), "no route matched");
    Response::builder().speak(text).build()
}
