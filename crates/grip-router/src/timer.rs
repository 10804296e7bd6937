//! Event-handler timer.
//!
//! The platform keeps the session open while an event handler is running.
//! Each handler lives for one interval; when it expires the skill may renew it
//! until the session's renewal budget is spent. Every start or renewal issues a
//! new token (the id of the request that caused it), so notifications from a
//! superseded handler no longer correlate.

use grip_core::config::SkillConfig;
use grip_core::directive::{build_start_timer, build_stop_timer, Directive, StartTimerOptions};
use grip_session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpiryOutcome {
    Renewed { remaining: u32, directive: Directive },
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct EventHandlerTimer {
    pub interval_ms: u64,
    pub budget: u32,
    pub namespace: String,
}

impl EventHandlerTimer {
    pub fn new(interval_ms: u64, budget: u32, namespace: impl Into<String>) -> Self {
        Self {
            interval_ms,
            budget,
            namespace: namespace.into(),
        }
    }

    pub fn from_config(config: &SkillConfig) -> Self {
        Self::new(
            config.timer_interval_ms,
            config.extension_budget,
            config.gadget_namespace.clone(),
        )
    }

    /// Arm a fresh handler with the full renewal budget.
    pub fn start(&self, session: &mut Session, request_id: &str) -> Directive {
        session.remaining_extensions = self.budget;
        self.arm(session, request_id)
    }

    /// Handle an expiry that has already been correlated to `session`.
    pub fn on_expired(&self, session: &mut Session, request_id: &str) -> ExpiryOutcome {
        if session.remaining_extensions == 0 {
            tracing::info!("event handler budget exhausted");
            return ExpiryOutcome::Exhausted;
        }
        session.remaining_extensions -= 1;
        let directive = self.arm(session, request_id);
        tracing::debug!(remaining = session.remaining_extensions, "event handler renewed");
        ExpiryOutcome::Renewed {
            remaining: session.remaining_extensions,
            directive,
        }
    }

    /// Stop the live handler, if there is one.
    pub fn stop(&self, session: &Session) -> Option<Directive> {
        session.token.as_deref().map(build_stop_timer)
    }

    fn arm(&self, session: &mut Session, request_id: &str) -> Directive {
        session.issue_token(request_id);
        build_start_timer(
            request_id,
            self.interval_ms,
            StartTimerOptions::for_namespace(self.namespace.as_str()),
        )
    }
}

impl Default for EventHandlerTimer {
    fn default() -> Self {
        Self::from_config(&SkillConfig::default())
    }
}
