//! Run engine: the workflow that produces progress events and the runner
//! that relays them to an observer off the caller's context.

pub mod runner;
pub mod workflow;

pub use runner::{ChannelObserver, Observer, RunHandle, RunSignal, TaskRunner};
pub use workflow::Workflow;

use std::any::Any;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
