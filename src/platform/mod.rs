//! Learning-platform API surface.
//!
//! The workflow only talks to the platform through [`Platform`], so it can
//! run against [`HttpPlatform`] in production and a scripted fake in tests.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Answer, AnswerRecord, Credentials, QuestionRef};

pub use http::HttpPlatform;

/// The three calls a run makes. Each is a single attempt.
#[async_trait]
pub trait Platform: Send + Sync {
    /// List the questions of `credentials.assignment_id`, in platform order.
    async fn list_questions(&self, credentials: &Credentials) -> Result<Vec<QuestionRef>>;

    /// Fetch the stored answer of one question.
    async fn fetch_answer(&self, credentials: &Credentials, question_id: &str)
    -> Result<AnswerRecord>;

    /// Submit `answer` for one question, echoing the platform's own id and
    /// answer values.
    async fn submit_answer(
        &self,
        credentials: &Credentials,
        question: &QuestionRef,
        answer: &Answer,
    ) -> Result<()>;
}
