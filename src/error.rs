//! Error types for the realms engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealmsError {
    /// A card id that does not resolve in the ability registry.
    /// Only a corrupt or mismatched log/registry can produce this.
    #[error("Unknown card id: {0}")]
    UnknownCard(String),

    /// A root event names a player who is not seated in the match
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid card registry: {0}")]
    InvalidRegistry(String),

    /// Rule expansion produced more follow-up events than any legal cascade can
    #[error("Cascade limit exceeded after {0} events")]
    CascadeLimit(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RealmsError {
    fn from(err: serde_json::Error) -> Self {
        RealmsError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RealmsError>;
