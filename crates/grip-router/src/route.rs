//! Request routes and their priority.
//!
//! Each route owns one predicate. Predicates only read typed fields, so they
//! cannot fail. The first route in [`ROUTE_ORDER`] whose predicate holds wins;
//! [`Route::Reflector`] catches everything else.

use grip_core::envelope::{Request, RequestKind};
use grip_session::Session;
use std::fmt;

pub mod intents {
    pub const SET_SPEED: &str = "SetSpeedIntent";
    pub const SET_COMMAND: &str = "SetCommandIntent";
    pub const MOVE: &str = "MoveIntent";
    pub const COME: &str = "ComeIntent";
    pub const BRING: &str = "BringIntent";
    pub const TAKE: &str = "TakeIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
}

pub mod slots {
    pub const SPEED: &str = "Speed";
    pub const DIRECTION: &str = "Direction";
    pub const DURATION: &str = "Duration";
    pub const COMMAND: &str = "Command";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Launch,
    SetSpeed,
    SetCommand,
    Move,
    Come,
    Bring,
    Take,
    /// Gadget events whose token is the session's live token.
    EventsReceived,
    /// Expiry of the session's live event handler.
    Expired,
    /// Events or expiries that did not correlate. Dropped.
    StaleCorrelation,
    Help,
    CancelAndStop,
    SessionEnded,
    Reflector,
}

/// Evaluation order. Order matters: the correlated event routes must precede
/// [`Route::StaleCorrelation`].
pub const ROUTE_ORDER: [Route; 13] = [
    Route::Launch,
    Route::SetSpeed,
    Route::SetCommand,
    Route::Move,
    Route::Come,
    Route::Bring,
    Route::Take,
    Route::EventsReceived,
    Route::Expired,
    Route::StaleCorrelation,
    Route::Help,
    Route::CancelAndStop,
    Route::SessionEnded,
];

fn is_intent(request: &Request, name: &str) -> bool {
    request.intent_name() == Some(name)
}

impl Route {
    pub fn matches(self, request: &Request, session: &Session) -> bool {
        match self {
            Route::Launch => matches!(request.kind, RequestKind::Launch),
            Route::SetSpeed => is_intent(request, intents::SET_SPEED),
            Route::SetCommand => is_intent(request, intents::SET_COMMAND),
            Route::Move => is_intent(request, intents::MOVE),
            Route::Come => is_intent(request, intents::COME),
            Route::Bring => is_intent(request, intents::BRING),
            Route::Take => is_intent(request, intents::TAKE),
            Route::EventsReceived => matches!(
                &request.kind,
                RequestKind::EventsReceived { token, .. } if session.token_matches(token)
            ),
            Route::Expired => matches!(
                &request.kind,
                RequestKind::Expired { token, .. } if session.token_matches(token)
            ),
            Route::StaleCorrelation => matches!(
                request.kind,
                RequestKind::EventsReceived { .. } | RequestKind::Expired { .. }
            ),
            Route::Help => is_intent(request, intents::HELP),
            Route::CancelAndStop => {
                is_intent(request, intents::CANCEL) || is_intent(request, intents::STOP)
            }
            Route::SessionEnded => matches!(request.kind, RequestKind::SessionEnded { .. }),
            Route::Reflector => true,
        }
    }

    /// First matching route, or the reflector.
    pub fn select(request: &Request, session: &Session) -> Route {
        ROUTE_ORDER
            .iter()
            .copied()
            .find(|route| route.matches(request, session))
            .unwrap_or(Route::Reflector)
    }

    pub fn name(self) -> &'static str {
        match self {
            Route::Launch => "launch",
            Route::SetSpeed => "set_speed",
            Route::SetCommand => "set_command",
            Route::Move => "move",
            Route::Come => "come",
            Route::Bring => "bring",
            Route::Take => "take",
            Route::EventsReceived => "events_received",
            Route::Expired => "expired",
            Route::StaleCorrelation => "stale_correlation",
            Route::Help => "help",
            Route::CancelAndStop => "cancel_and_stop",
            Route::SessionEnded => "session_ended",
            Route::Reflector => "reflector",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
