//! Progress events emitted by a run.
//!
//! Events are the only observable output of a run besides the completion
//! signal. They are human-readable lines, delivered in the order produced.

use serde::{Deserialize, Serialize};

/// A single progress line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum ProgressEvent {
    Info(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

impl ProgressEvent {
    pub fn info(message: impl Into<String>) -> Self {
        ProgressEvent::Info(message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        ProgressEvent::Warning(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProgressEvent::Error(message.into())
    }

    pub fn level(&self) -> Level {
        match self {
            ProgressEvent::Info(_) => Level::Info,
            ProgressEvent::Warning(_) => Level::Warning,
            ProgressEvent::Error(_) => Level::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProgressEvent::Info(m) | ProgressEvent::Warning(m) | ProgressEvent::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProgressEvent::Error(_))
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level(), self.message())
    }
}
