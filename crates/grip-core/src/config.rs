//! Runtime configuration.
//!
//! Values come from `GRIP__<SECTION>__<KEY>` environment variables (an
//! optional `.env` file is read first). Anything unset keeps its default.

use crate::error::{GripError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GripConfig {
    pub server: ServerConfig,
    pub skill: SkillConfig,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Behaviour of the skill itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Custom interface namespace the gadget listens on.
    pub gadget_namespace: String,
    /// Directive name for control payloads.
    pub control_name: String,
    pub timer_interval_ms: u64,
    /// How many times an expired event handler is renewed before the session ends.
    pub extension_budget: u32,
    pub default_speed: u8,
    /// Proximity readings below this count as an intruder.
    pub proximity_alert_distance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            gadget_namespace: "Custom.Mindstorms.Gadget".into(),
            control_name: "control".into(),
            timer_interval_ms: 60_000,
            extension_budget: 10,
            default_speed: 50,
            proximity_alert_distance: 10,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl GripConfig {
    /// Load from the environment on top of the defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GRIP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GripError::Config("server.port must be non-zero".into()));
        }
        if self.skill.timer_interval_ms == 0 {
            return Err(GripError::Config("skill.timer_interval_ms must be non-zero".into()));
        }
        if !(1..=100).contains(&self.skill.default_speed) {
            return Err(GripError::Config(format!(
                "skill.default_speed must be within 1..=100, got {}",
                self.skill.default_speed
            )));
        }
        if self.skill.gadget_namespace.is_empty() {
            return Err(GripError::Config("skill.gadget_namespace must not be empty".into()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
