// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Progress reporting for stack executions.
//!
//! The runner and processors report through a single injected
//! [`ProgressSink`]. Fan-out workers may call the sink concurrently, so every
//! implementation is `Send + Sync`; [`ChannelProgress`] serializes events
//! through an unbounded channel when the consumer needs strict ordering.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::observability::messages::{runner::ProgressReported, StructuredLog};

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    StepStarted {
        processor_id: String,
        display_name: String,
        step_index: usize,
        total_steps: usize,
    },
    StepCompleted {
        processor_id: String,
        display_name: String,
        step_index: usize,
        total_steps: usize,
        elapsed: Duration,
    },
    StepFailed {
        processor_id: String,
        step_index: usize,
        total_steps: usize,
        error: String,
    },
    /// Fan-out progress inside one step.
    Items {
        processor_id: String,
        completed: usize,
        total: usize,
    },
}

impl ProgressEvent {
    pub fn processor_id(&self) -> &str {
        match self {
            ProgressEvent::StepStarted { processor_id, .. }
            | ProgressEvent::StepCompleted { processor_id, .. }
            | ProgressEvent::StepFailed { processor_id, .. }
            | ProgressEvent::Items { processor_id, .. } => processor_id,
        }
    }
}

#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_progress(&self, event: ProgressEvent);
}

/// Discards every event.
pub struct NoopProgress;

#[async_trait]
impl ProgressSink for NoopProgress {
    async fn on_progress(&self, _event: ProgressEvent) {}
}

/// Logs every event through `tracing`.
pub struct TracingProgress;

#[async_trait]
impl ProgressSink for TracingProgress {
    async fn on_progress(&self, event: ProgressEvent) {
        ProgressReported { event: &event }.log();
    }
}

/// Forwards events into an unbounded channel.
///
/// Send errors (receiver dropped) are ignored; progress is best effort.
pub struct ChannelProgress {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(sender: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl ProgressSink for ChannelProgress {
    async fn on_progress(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

/// Wraps a synchronous closure.
pub struct FnProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
}

impl<F> FnProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> ProgressSink for FnProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    async fn on_progress(&self, event: ProgressEvent) {
        (self.callback)(event);
    }
}
