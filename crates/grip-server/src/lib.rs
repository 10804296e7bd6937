//! Grip HTTP server (Axum).
//!
//! Exposes the skill webhook that the voice platform posts request envelopes
//! to, plus a health probe.

pub mod discovery;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::skill_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
