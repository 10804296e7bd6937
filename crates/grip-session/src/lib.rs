//! Per-conversation state for the grip skill.

pub mod attributes;
pub mod session;

pub use attributes::{keys, AttributeBag};
pub use session::*;

#[cfg(test)]
mod tests;
