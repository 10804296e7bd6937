pub mod config;
pub mod directive;
pub mod envelope;
pub mod error;
pub mod response;
pub mod types;

pub use config::GripConfig;
pub use directive::{ControlPayload, Directive};
pub use envelope::{Intent, Request, RequestEnvelope, RequestKind, ResponseEnvelope};
pub use error::{GripError, Result};
pub use response::Response;
