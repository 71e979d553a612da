//! Run and item span helpers.
//!
//! Every run gets a `run.execute` span; every question processed inside it
//! gets a child `run.item` span whose outcome is recorded once known.

use tracing::Span;

use crate::model::{ItemOutcome, RunId};

/// Start a span for one run of the workflow.
pub fn start_run_span(run_id: &RunId, assignment_id: &str) -> Span {
    tracing::info_span!(
        "run.execute",
        "run.id" = %run_id,
        "run.assignment_id" = assignment_id,
        "run.questions" = tracing::field::Empty,
    )
}

/// Start a span for one question. `index` is 1-based.
///
/// The `item.outcome` field is declared empty and filled by
/// [`record_item_outcome`].
pub fn start_item_span(index: usize, question_id: &str) -> Span {
    tracing::info_span!(
        "run.item",
        "item.index" = index,
        "item.question_id" = question_id,
        "item.outcome" = tracing::field::Empty,
    )
}

/// Record how an item ended on its span.
pub fn record_item_outcome(span: &Span, outcome: &ItemOutcome) {
    span.record("item.outcome", outcome.label());
    span.in_scope(|| match outcome {
        ItemOutcome::Failed { kind, detail } => {
            tracing::warn!(%kind, detail = detail.as_str(), "item failed");
        }
        _ => tracing::debug!(outcome = outcome.label(), "item finished"),
    });
}
