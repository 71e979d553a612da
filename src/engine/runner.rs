//! Task runner: executes a workflow on its own task and relays its events.
//!
//! A run is two tasks. The worker drains the workflow stream into an
//! unbounded channel; the relay owns the observer and calls it once per
//! event, in order, then signals completion exactly once. The relay joins the
//! worker before completing, so a panic that escapes the workflow is still
//! reported and still followed by `on_complete`.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::panic_message;
use super::workflow::Workflow;
use crate::error::{Error, Result};
use crate::event::ProgressEvent;
use crate::model::{Credentials, RunId};

/// Receives a run's notifications. Never called concurrently.
pub trait Observer: Send + 'static {
    fn on_event(&mut self, event: ProgressEvent);

    /// Called once, after the last event.
    fn on_complete(&mut self);
}

/// A notification forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSignal {
    Event(ProgressEvent),
    Complete,
}

/// Observer that forwards notifications to a channel, so a presentation
/// layer can consume them on its own loop.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<RunSignal>,
}

impl ChannelObserver {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RunSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Observer for ChannelObserver {
    fn on_event(&mut self, event: ProgressEvent) {
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(RunSignal::Event(event));
    }

    fn on_complete(&mut self) {
        let _ = self.tx.send(RunSignal::Complete);
    }
}

/// Starts exactly one run. Consumed by [`TaskRunner::start`].
#[derive(Debug, Default)]
pub struct TaskRunner {
    _private: (),
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin executing `workflow` and return immediately.
    ///
    /// Must be called from within a Tokio runtime. Blank credentials are
    /// refused: the observer gets a single error event, no task is spawned
    /// and `on_complete` is not called because no run started.
    pub fn start<O: Observer>(
        self,
        workflow: Workflow,
        credentials: Credentials,
        mut observer: O,
    ) -> Result<RunHandle> {
        if let Err(e) = credentials.validate() {
            warn!("refusing to start run: {e}");
            observer.on_event(ProgressEvent::error(e.to_string()));
            return Err(e);
        }

        let run_id = workflow.run_id();
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();

        info!(run_id = %run_id, assignment_id = %credentials.assignment_id, "run started");

        let worker = tokio::spawn(async move {
            let events = workflow.execute(credentials);
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        let relay = tokio::spawn(async move {
            let mut delivered = 0usize;
            while let Some(event) = rx.recv().await {
                observer.on_event(event);
                delivered += 1;
            }

            if let Err(e) = worker.await {
                let message = if e.is_panic() {
                    panic_message(&*e.into_panic())
                } else {
                    e.to_string()
                };
                error!(run_id = %run_id, error = %message, "run aborted");
                observer.on_event(ProgressEvent::error(format!("unexpected error: {message}")));
                delivered += 1;
            }

            debug!(run_id = %run_id, delivered, "relay drained");
            observer.on_complete();
            info!(run_id = %run_id, "run completed");
        });

        Ok(RunHandle { run_id, relay })
    }
}

/// Handle to a started run.
pub struct RunHandle {
    run_id: RunId,
    relay: JoinHandle<()>,
}

impl RunHandle {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn is_finished(&self) -> bool {
        self.relay.is_finished()
    }

    /// Wait until `on_complete` has been delivered and both tasks are gone.
    pub async fn wait(self) -> Result<()> {
        self.relay.await.map_err(|e| {
            if e.is_panic() {
                Error::Unexpected(format!(
                    "observer panicked: {}",
                    panic_message(&*e.into_panic())
                ))
            } else {
                Error::Other(format!("relay task failed: {e}"))
            }
        })
    }
}
