//! Grip request router: ordered route matching, command handlers, and the
//! event-handler timer that keeps a conversation alive between gadget events.

pub mod discovery;
pub mod dispatcher;
pub mod events;
mod handlers;
pub mod route;
pub mod speech;
pub mod timer;

pub use discovery::{EndpointDiscovery, StaticDiscovery};
pub use dispatcher::{Dispatcher, Outcome};
pub use events::{EventInterpreter, GadgetEvent};
pub use route::{Route, ROUTE_ORDER};
pub use timer::{EventHandlerTimer, ExpiryOutcome};
