//! # hwpilot
//!
//! Answers an assignment on the learning platform by fetching each
//! question's stored answer and submitting it back.
//!
//! [`engine::Workflow`] produces a lazy stream of [`event::ProgressEvent`]s;
//! [`engine::TaskRunner`] runs it on its own task and relays every event to
//! an [`engine::Observer`], followed by exactly one completion signal.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod platform;
pub mod telemetry;
