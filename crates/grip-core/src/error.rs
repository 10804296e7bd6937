use thiserror::Error;

#[derive(Error, Debug)]
pub enum GripError {
    #[error("No gadget endpoint connected")]
    NoEndpoint,
    #[error("Discovery error: {0}")]
    Discovery(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for GripError {
    fn from(err: config::ConfigError) -> Self {
        GripError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GripError>;
