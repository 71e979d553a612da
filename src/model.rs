//! Core data model.
//!
//! A run works on one assignment with one credential set. The listing call
//! yields question refs, each question yields an answer record, and every
//! question ends in exactly one item outcome.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The two inputs a run needs. Supplied once, never persisted.
#[derive(Debug)]
pub struct Credentials {
    pub assignment_id: String,
    pub access_token: SecretString,
}

impl Credentials {
    pub fn new(assignment_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Both fields must be non-blank before a run may start.
    pub fn validate(&self) -> crate::error::Result<()> {
        let token = self.access_token.expose_secret();
        if self.assignment_id.trim().is_empty() || token.trim().is_empty() {
            return Err(crate::error::Error::InvalidCredentials);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Questions and answers
// ---------------------------------------------------------------------------

/// One entry of the assignment's question listing.
///
/// `id` is the text used in URLs and progress lines. `wire_id` is the value
/// exactly as the platform sent it and is echoed back on submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawQuestionRef")]
pub struct QuestionRef {
    pub id: String,
    pub wire_id: Value,
}

impl QuestionRef {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            wire_id: Value::String(id.clone()),
            id,
        }
    }
}

#[derive(Deserialize)]
struct RawQuestionRef {
    id: Value,
}

/// The platform hands out ids as strings on some deployments and as plain
/// numbers on others.
impl TryFrom<RawQuestionRef> for QuestionRef {
    type Error = String;

    fn try_from(raw: RawQuestionRef) -> Result<Self, Self::Error> {
        let id = match &raw.id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(format!("question id must be a string or number, got {other}")),
        };
        Ok(Self {
            id,
            wire_id: raw.id,
        })
    }
}

/// A stored answer, kept as the platform's own JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer(pub Value);

impl Answer {
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer(Value::String(s.to_string()))
    }
}

/// Strings print bare; anything else prints as compact JSON.
impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}

/// The stored answer of one question. `answer: None` means skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: String,
    pub answer: Option<Answer>,
}

impl AnswerRecord {
    /// Normalize the raw `data.answer` value.
    ///
    /// Missing, `null`, `""`, `[]`, `{}`, `false` and zero are all absent.
    pub fn from_value(question_id: impl Into<String>, raw: Option<Value>) -> Self {
        let answer = raw.filter(|v| !is_blank(v)).map(Answer);
        Self {
            question_id: question_id.into(),
            answer,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Item outcome
// ---------------------------------------------------------------------------

/// Failure taxonomy for platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection, DNS or timeout.
    Transport,
    /// Non-success status code.
    Protocol,
    /// Body not in the expected shape.
    Decode,
    /// Well-formed response lacking the expected value.
    DataAbsent,
    /// Anything the above do not cover.
    Unexpected,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Transport => "transport",
            FailureKind::Protocol => "protocol",
            FailureKind::Decode => "decode",
            FailureKind::DataAbsent => "data_absent",
            FailureKind::Unexpected => "unexpected",
        };
        write!(f, "{s}")
    }
}

/// How a single question ended. Every item resolves to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Submitted,
    Skipped(FailureKind),
    Failed { kind: FailureKind, detail: String },
}

impl ItemOutcome {
    pub fn failed(err: &crate::error::Error) -> Self {
        ItemOutcome::Failed {
            kind: err.failure_kind(),
            detail: err.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Submitted => "submitted",
            ItemOutcome::Skipped(_) => "skipped",
            ItemOutcome::Failed { .. } => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Run id
// ---------------------------------------------------------------------------

/// Newtype for run ids. Only used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}
