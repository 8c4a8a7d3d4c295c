use thiserror::Error;

/// Errors raised at the crate boundary (configuration and snapshot I/O)
///
/// Simulation operations themselves are total and never produce these.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),
}

impl From<&str> for SimError {
    fn from(message: &str) -> Self {
        SimError::InvalidConfig(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
