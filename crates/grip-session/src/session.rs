use crate::attributes::{keys, AttributeBag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::num::IntErrorKind;

/// Motor speed as a percentage, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);
    pub const DEFAULT: Speed = Speed(50);

    /// Clamp any integer into range.
    pub fn clamped(raw: i64) -> Self {
        Speed(raw.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Parse a spoken slot value. Out-of-range numbers clamp, including ones
    /// too large for an `i64`. Non-numeric input yields `None`.
    pub fn from_slot(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) => Some(Self::clamped(n)),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Some(Self::MAX),
                IntErrorKind::NegOverflow => Some(Self::MIN),
                _ => raw
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| Self::clamped(f.trunc() as i64)),
            },
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the conversation is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    #[default]
    NoSession,
    AwaitingCommand,
    /// A control directive is in flight.
    AwaitingGadget,
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NoSession => write!(f, "no_session"),
            SessionPhase::AwaitingCommand => write!(f, "awaiting_command"),
            SessionPhase::AwaitingGadget => write!(f, "awaiting_gadget"),
            SessionPhase::Ended => write!(f, "ended"),
        }
    }
}

/// Typed view of the attribute bag for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub endpoint_id: Option<String>,
    /// `None` until the user sets a speed.
    pub speed: Option<Speed>,
    /// Token of the live event handler.
    pub token: Option<String>,
    pub remaining_extensions: u32,
    pub phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(bag: &AttributeBag) -> Self {
        let endpoint_id = bag
            .get_or::<Option<String>>(keys::ENDPOINT_ID, None)
            .filter(|id| !id.is_empty());
        let speed = bag
            .get_or::<Option<i64>>(keys::SPEED, None)
            .map(Speed::clamped);
        let token = bag
            .get_or::<Option<String>>(keys::TOKEN, None)
            .filter(|t| !t.is_empty());

        Self {
            endpoint_id,
            speed,
            token,
            remaining_extensions: bag.get_or(keys::DURATION, 0u32),
            phase: bag.get_or(keys::PHASE, SessionPhase::NoSession),
        }
    }

    /// Write every field back, leaving unrelated keys untouched.
    pub fn store(&self, bag: &mut AttributeBag) {
        match &self.endpoint_id {
            Some(id) => bag.set(keys::ENDPOINT_ID, id.as_str()),
            None => {
                bag.remove(keys::ENDPOINT_ID);
            }
        }
        match self.speed {
            Some(speed) => bag.set(keys::SPEED, speed.percent()),
            None => {
                bag.remove(keys::SPEED);
            }
        }
        match &self.token {
            Some(token) => bag.set(keys::TOKEN, token.as_str()),
            None => {
                bag.remove(keys::TOKEN);
            }
        }
        bag.set(keys::DURATION, self.remaining_extensions);
        let phase = serde_json::to_value(self.phase).unwrap_or(Value::Null);
        bag.set(keys::PHASE, phase);
    }

    pub fn from_attributes(attributes: &Map<String, Value>) -> Self {
        Self::load(&AttributeBag::from_map(attributes.clone()))
    }

    /// Merge into `base` and return the resulting attribute map.
    pub fn to_attributes(&self, base: Map<String, Value>) -> Map<String, Value> {
        let mut bag = AttributeBag::from_map(base);
        self.store(&mut bag);
        bag.into_map()
    }

    pub fn speed_or(&self, default: Speed) -> Speed {
        self.speed.unwrap_or(default)
    }

    /// Start a conversation against `endpoint_id`.
    pub fn begin(&mut self, endpoint_id: impl Into<String>) {
        self.endpoint_id = Some(endpoint_id.into());
        self.phase = SessionPhase::AwaitingCommand;
    }

    /// Replace the live token. Notifications carrying the old one become stale.
    pub fn issue_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token_matches(&self, token: &str) -> bool {
        !token.is_empty() && self.token.as_deref() == Some(token)
    }

    pub fn endpoint_matches(&self, endpoint_id: Option<&str>) -> bool {
        match (self.endpoint_id.as_deref(), endpoint_id) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    pub fn await_gadget(&mut self) {
        self.phase = SessionPhase::AwaitingGadget;
    }

    pub fn await_command(&mut self) {
        self.phase = SessionPhase::AwaitingCommand;
    }

    /// Close the conversation. Any later notification is stale.
    pub fn end(&mut self) {
        self.token = None;
        self.phase = SessionPhase::Ended;
    }

    /// Launched and not yet ended.
    pub fn is_live(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::AwaitingCommand | SessionPhase::AwaitingGadget
        )
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(endpoint={}, phase={}, remaining={})",
            self.endpoint_id.as_deref().unwrap_or("-"),
            self.phase,
            self.remaining_extensions
        )
    }
}
