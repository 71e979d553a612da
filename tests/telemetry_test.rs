//! Integration tests for telemetry initialization and span helpers.

use hwpilot::model::{FailureKind, ItemOutcome, RunId};
use hwpilot::telemetry::run::{record_item_outcome, start_item_span, start_run_span};
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// (span name, field, value) triples, in the order they were recorded.
type Recorded = Arc<Mutex<Vec<(String, String, String)>>>;

/// Layer that keeps every span field it sees.
#[derive(Clone, Default)]
struct CaptureLayer {
    recorded: Recorded,
}

struct FieldVisitor<'a> {
    span: &'static str,
    out: &'a mut Vec<(String, String, String)>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.out
            .push((self.span.to_string(), field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.out
            .push((self.span.to_string(), field.name().to_string(), format!("{value:?}")));
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut out = self.recorded.lock().unwrap();
        attrs.record(&mut FieldVisitor {
            span: attrs.metadata().name(),
            out: &mut out,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut out = self.recorded.lock().unwrap();
        values.record(&mut FieldVisitor {
            span: span.name(),
            out: &mut out,
        });
    }
}

fn values(recorded: &Recorded, span: &str, field: &str) -> Vec<String> {
    recorded
        .lock()
        .unwrap()
        .iter()
        .filter(|(s, f, _)| s == span && f == field)
        .map(|(_, _, v)| v.clone())
        .collect()
}

#[test]
fn telemetry_initializes_once() {
    // The global subscriber can only be set once per process; a second
    // attempt must be reported rather than panic.
    let first = hwpilot::telemetry::init_telemetry(Default::default());
    let second = hwpilot::telemetry::init_telemetry(Default::default());
    assert!(first.is_ok());
    assert!(second.is_err());
}

#[test]
fn run_and_item_spans_record_outcomes() {
    let layer = CaptureLayer::default();
    let recorded = layer.recorded.clone();
    let subscriber = tracing_subscriber::registry().with(layer);
    let run_id = RunId::new();

    tracing::subscriber::with_default(subscriber, || {
        let run = start_run_span(&run_id, "42");
        run.record("run.questions", 3usize);
        let item = run.in_scope(|| start_item_span(1, "q1"));
        record_item_outcome(&item, &ItemOutcome::Submitted);
        record_item_outcome(&item, &ItemOutcome::Skipped(FailureKind::DataAbsent));
        record_item_outcome(
            &item,
            &ItemOutcome::Failed {
                kind: FailureKind::Transport,
                detail: "connection refused".to_string(),
            },
        );
    });

    assert_eq!(values(&recorded, "run.execute", "run.id"), vec![run_id.to_string()]);
    assert_eq!(values(&recorded, "run.execute", "run.assignment_id"), vec!["42"]);
    assert_eq!(values(&recorded, "run.execute", "run.questions"), vec!["3"]);
    assert_eq!(values(&recorded, "run.item", "item.index"), vec!["1"]);
    assert_eq!(values(&recorded, "run.item", "item.question_id"), vec!["q1"]);
    assert_eq!(
        values(&recorded, "run.item", "item.outcome"),
        vec!["submitted", "skipped", "failed"]
    );
}
