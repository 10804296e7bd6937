//! Session-scoped attribute bag.
//!
//! The platform stores the bag between requests and hands it back verbatim.
//! Reads never fail: a missing key or a value of the wrong shape resolves to
//! the caller's default.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub mod keys {
    pub const ENDPOINT_ID: &str = "endpointId";
    pub const SPEED: &str = "speed";
    pub const TOKEN: &str = "token";
    /// Remaining event-handler renewals.
    pub const DURATION: &str = "duration";
    pub const PHASE: &str = "phase";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    inner: Map<String, Value>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.inner
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Typed read with a fallback.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.inner.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => match serde_json::from_value(v.clone()) {
                Ok(t) => t,
                Err(err) => {
                    tracing::debug!(key, error = %err, "attribute has unexpected shape, using default");
                    default
                }
            },
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
