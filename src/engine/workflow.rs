//! The answer-submission workflow.
//!
//! Step A lists the assignment's questions; any failure there ends the run.
//! Step B walks the list in order, fetching and submitting each answer.
//! Failures in step B are scoped to their item and the loop always moves on.

use futures::{FutureExt, Stream};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, info};

use super::panic_message;
use crate::error::{Error, Result};
use crate::event::ProgressEvent;
use crate::model::{AnswerRecord, Credentials, FailureKind, ItemOutcome, RunId};
use crate::platform::Platform;
use crate::telemetry::run::{record_item_outcome, start_item_span, start_run_span};

/// One run of the workflow against one platform. Consumed by [`Workflow::execute`].
pub struct Workflow {
    platform: Arc<dyn Platform>,
    run_id: RunId,
}

impl Workflow {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            run_id: RunId::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Produce the run's progress events.
    ///
    /// Nothing is requested until the stream is polled. The stream ends after
    /// `"all items processed"`, or earlier if the listing step fails or
    /// comes back empty.
    pub fn execute(
        self,
        credentials: Credentials,
    ) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        let Workflow { platform, run_id } = self;

        async_stream::stream! {
            let run_span = start_run_span(&run_id, &credentials.assignment_id);

            // Not guarded: an unexpected failure here belongs to the runner.
            let listed = platform
                .list_questions(&credentials)
                .instrument(run_span.clone())
                .await;
            let questions = match listed {
                Ok(questions) => questions,
                Err(e) => {
                    run_span.in_scope(|| tracing::warn!(error = %e, "listing failed"));
                    yield listing_failure(&e);
                    return;
                }
            };

            if questions.is_empty() {
                yield ProgressEvent::error("no question ids found");
                return;
            }

            let total = questions.len();
            run_span.record("run.questions", total);
            run_span.in_scope(|| info!(total, "questions listed"));
            yield ProgressEvent::info(format!("fetched {total} questions"));

            for (i, question) in questions.iter().enumerate() {
                let index = i + 1;
                let item_span = run_span.in_scope(|| start_item_span(index, &question.id));

                yield ProgressEvent::info(format!(
                    "processing item {index}/{total}: {}",
                    question.id
                ));

                let fetched = guarded(platform.fetch_answer(&credentials, &question.id))
                    .instrument(item_span.clone())
                    .await;

                let outcome = match fetched {
                    Err(e) => ItemOutcome::failed(&e),
                    Ok(AnswerRecord { answer: None, .. }) => {
                        ItemOutcome::Skipped(FailureKind::DataAbsent)
                    }
                    Ok(AnswerRecord { answer: Some(answer), .. }) => {
                        yield ProgressEvent::info(format!("answer: {answer}"));

                        let submission = platform.submit_answer(&credentials, question, &answer);
                        let submitted = guarded(submission)
                            .instrument(item_span.clone())
                            .await;
                        match submitted {
                            Ok(()) => ItemOutcome::Submitted,
                            Err(e) => ItemOutcome::failed(&e),
                        }
                    }
                };

                record_item_outcome(&item_span, &outcome);
                yield item_event(index, &question.id, &outcome);
            }

            yield ProgressEvent::info("all items processed");
        }
    }
}

/// Run one platform call, turning a panic into [`Error::Unexpected`].
async fn guarded<T>(call: impl Future<Output = Result<T>>) -> Result<T> {
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(Error::Unexpected(panic_message(&*payload))),
    }
}

fn listing_failure(err: &Error) -> ProgressEvent {
    match err.failure_kind() {
        FailureKind::Transport | FailureKind::Protocol => {
            ProgressEvent::error(format!("network error: {err}"))
        }
        FailureKind::Decode => {
            ProgressEvent::error(format!("failed to parse question list: {err}"))
        }
        FailureKind::DataAbsent | FailureKind::Unexpected => {
            ProgressEvent::error(format!("unexpected error: {err}"))
        }
    }
}

/// The terminal event of one item.
fn item_event(index: usize, question_id: &str, outcome: &ItemOutcome) -> ProgressEvent {
    match outcome {
        ItemOutcome::Submitted => {
            ProgressEvent::info(format!("item {index} submitted successfully"))
        }
        ItemOutcome::Skipped(_) => {
            ProgressEvent::warning(format!("answer not found for {question_id}, skipping"))
        }
        ItemOutcome::Failed { kind, detail } => match kind {
            FailureKind::Transport | FailureKind::Protocol => {
                ProgressEvent::error(format!("network error processing {question_id}: {detail}"))
            }
            FailureKind::Decode => ProgressEvent::error(format!(
                "failed to parse response for {question_id}: {detail}"
            )),
            FailureKind::DataAbsent | FailureKind::Unexpected => ProgressEvent::error(format!(
                "unexpected error processing {question_id}: {detail}"
            )),
        },
    }
}
