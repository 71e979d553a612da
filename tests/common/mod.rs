//! Scripted in-memory platform shared by the workflow and runner tests.

#![allow(dead_code)]

use async_trait::async_trait;
use hwpilot::error::{Error, Result};
use hwpilot::model::{Answer, AnswerRecord, Credentials, QuestionRef};
use hwpilot::platform::Platform;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub enum Listing {
    Questions(Vec<&'static str>),
    Transport,
    Status(u16),
    Decode,
    Panic(&'static str),
}

#[derive(Debug, Clone)]
pub enum Detail {
    Answer(&'static str),
    Absent,
    Transport,
    Decode,
    Panic(&'static str),
}

#[derive(Debug, Clone)]
pub enum Submit {
    Ok,
    Transport,
    Status(u16),
    Panic(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { assignment_id: String, token: String },
    Fetch(String),
    Submit { question_id: String, answer: String },
}

/// Platform whose replies are fixed up front. Unscripted questions have an
/// absent answer; unscripted submissions succeed.
pub struct FakePlatform {
    listing: Listing,
    details: HashMap<String, Detail>,
    submits: HashMap<String, Submit>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
}

impl FakePlatform {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            details: HashMap::new(),
            submits: HashMap::new(),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn listing(ids: &[&'static str]) -> Self {
        Self::new(Listing::Questions(ids.to_vec()))
    }

    pub fn detail(mut self, id: &str, detail: Detail) -> Self {
        self.details.insert(id.to_string(), detail);
        self
    }

    pub fn submit(mut self, id: &str, submit: Submit) -> Self {
        self.submits.insert(id.to_string(), submit);
        self
    }

    /// Hold the listing call until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit { question_id, .. } => Some(question_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// A real reqwest error, produced without touching the network.
pub async fn transport_error() -> Error {
    let err = reqwest::get("not a url").await.unwrap_err();
    Error::Transport(err)
}

fn status_error(status: u16) -> Error {
    Error::Protocol {
        status,
        url: "http://platform.test".to_string(),
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn list_questions(&self, credentials: &Credentials) -> Result<Vec<QuestionRef>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.record(Call::List {
            assignment_id: credentials.assignment_id.clone(),
            token: credentials.access_token.expose_secret().to_string(),
        });
        match &self.listing {
            Listing::Questions(ids) => Ok(ids.iter().map(|id| QuestionRef::new(*id)).collect()),
            Listing::Transport => Err(transport_error().await),
            Listing::Status(status) => Err(status_error(*status)),
            Listing::Decode => Err(Error::Decode("expected value at line 1 column 1".into())),
            Listing::Panic(msg) => panic!("{msg}"),
        }
    }

    async fn fetch_answer(
        &self,
        _credentials: &Credentials,
        question_id: &str,
    ) -> Result<AnswerRecord> {
        self.record(Call::Fetch(question_id.to_string()));
        let detail = self
            .details
            .get(question_id)
            .cloned()
            .unwrap_or(Detail::Absent);
        match detail {
            Detail::Answer(a) => Ok(AnswerRecord {
                question_id: question_id.to_string(),
                answer: Some(Answer::from(a)),
            }),
            Detail::Absent => Ok(AnswerRecord {
                question_id: question_id.to_string(),
                answer: None,
            }),
            Detail::Transport => Err(transport_error().await),
            Detail::Decode => Err(Error::Decode("invalid type: string".into())),
            Detail::Panic(msg) => panic!("{msg}"),
        }
    }

    async fn submit_answer(
        &self,
        _credentials: &Credentials,
        question: &QuestionRef,
        answer: &Answer,
    ) -> Result<()> {
        self.record(Call::Submit {
            question_id: question.id.clone(),
            answer: answer.to_string(),
        });
        let submit = self
            .submits
            .get(&question.id)
            .cloned()
            .unwrap_or(Submit::Ok);
        match submit {
            Submit::Ok => Ok(()),
            Submit::Transport => Err(transport_error().await),
            Submit::Status(status) => Err(status_error(status)),
            Submit::Panic(msg) => panic!("{msg}"),
        }
    }
}
