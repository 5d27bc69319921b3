//! Error types for MeshInvite

use thiserror::Error;

/// Result type alias using MeshInvite Error
pub type Result<T> = std::result::Result<T, Error>;

/// MeshInvite error types
///
/// Daemon interaction never surfaces here: failed invocations come back as
/// [`crate::CommandResult`] values and invite outcomes as
/// [`crate::InviteOutcome`]. These variants cover setup and input validation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid node name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
