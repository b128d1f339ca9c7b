use stockpick_core::{CoreError, SessionError, SourceError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("search failed: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Source(error) => Self::Source(error),
            CoreError::Session(error) => Self::Session(error),
            CoreError::Serialization(error) => Self::Serialization(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Source(_) => 3,
            Self::Serialization(_) => 4,
            Self::Session(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
