//! Error types for hwpilot.

use thiserror::Error;

use crate::model::FailureKind;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS, timeout or body-read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Protocol { status: u16, url: String },

    #[error("{0}")]
    Decode(String),

    #[error("assignment id and access token must not be empty")]
    InvalidCredentials,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Unexpected(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Where this error sits in the failure taxonomy reported per item.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Transport(_) => FailureKind::Transport,
            Error::Protocol { .. } => FailureKind::Protocol,
            Error::Decode(_) => FailureKind::Decode,
            _ => FailureKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
