//! HTTP client for the platform's REST endpoints.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::Platform;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Answer, AnswerRecord, Credentials, QuestionRef};

const TOKEN_HEADER: &str = "X-Access-Token";

/// `{ data: [ { id, ... } ] }`
#[derive(Debug, Deserialize)]
struct QuestionList {
    #[serde(default)]
    data: Option<Vec<QuestionRef>>,
}

/// `{ data: { answer, ... } }`
#[derive(Debug, Deserialize)]
struct QuestionDetail {
    #[serde(default)]
    data: Option<DetailData>,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    #[serde(default)]
    answer: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerSubmission<'a> {
    homework_question_id: &'a serde_json::Value,
    user_answer: &'a serde_json::Value,
}

/// reqwest-backed [`Platform`].
pub struct HttpPlatform {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpPlatform {
    /// Create a client with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, inner))
    }

    /// Use a preconfigured client (proxy, TLS roots, timeouts).
    pub fn with_client(base_url: &str, inner: reqwest::Client) -> Self {
        Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path and decode the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        url: &str,
    ) -> Result<T> {
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .get(url)
            .header(TOKEN_HEADER, credentials.access_token.expose_secret())
            .send()
            .await?;

        let response = check_status(response)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Protocol {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl Platform for HttpPlatform {
    async fn list_questions(&self, credentials: &Credentials) -> Result<Vec<QuestionRef>> {
        let url = reqwest::Url::parse_with_params(
            &self.url("/api/course/homeworkQuestions/student"),
            &[("homeworkId", credentials.assignment_id.as_str())],
        )
        .map_err(|e| Error::Other(format!("bad listing url: {e}")))?;

        let list: QuestionList = self.get_json(credentials, url.as_str()).await?;
        Ok(list.data.unwrap_or_default())
    }

    async fn fetch_answer(
        &self,
        credentials: &Credentials,
        question_id: &str,
    ) -> Result<AnswerRecord> {
        let url = self.url(&format!("/api/course/homeworkQuestions/{question_id}"));
        let detail: QuestionDetail = self.get_json(credentials, &url).await?;
        let raw = detail.data.and_then(|d| d.answer);
        Ok(AnswerRecord::from_value(question_id, raw))
    }

    async fn submit_answer(
        &self,
        credentials: &Credentials,
        question: &QuestionRef,
        answer: &Answer,
    ) -> Result<()> {
        let url = self.url("/api/course/hwAnswers/answer");
        debug!(url = %url, question_id = %question.id, "PUT request");

        let response = self
            .inner
            .put(&url)
            .header(TOKEN_HEADER, credentials.access_token.expose_secret())
            .json(&AnswerSubmission {
                homework_question_id: &question.wire_id,
                user_answer: answer.value(),
            })
            .send()
            .await?;

        check_status(response)?;
        Ok(())
    }
}
