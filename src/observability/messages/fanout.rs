// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for bounded fan-out and operation timing.

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Fan-out started.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
///
/// # Example
/// ```
/// use framestack::observability::messages::fanout::FanOutStarted;
///
/// let msg = FanOutStarted {
///     item_count: 120,
///     concurrency: 4,
/// };
///
/// assert_eq!(msg.to_string(), "Fan-out started: 120 items, concurrency=4");
/// ```
pub struct FanOutStarted {
    pub item_count: usize,
    pub concurrency: usize,
}

impl Display for FanOutStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fan-out started: {} items, concurrency={}",
            self.item_count, self.concurrency
        )
    }
}

impl StructuredLog for FanOutStarted {
    fn log(&self) {
        tracing::debug!(
            item_count = self.item_count,
            concurrency = self.concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fan_out",
            span_name = name,
            item_count = self.item_count,
            concurrency = self.concurrency,
        )
    }
}

/// Fan-out finished; every item reached a terminal state.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct FanOutCompleted {
    pub item_count: usize,
    pub failure_count: usize,
    pub duration: std::time::Duration,
}

impl Display for FanOutCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fan-out completed: {} items, {} failed, duration={:?}",
            self.item_count, self.failure_count, self.duration
        )
    }
}

impl StructuredLog for FanOutCompleted {
    fn log(&self) {
        tracing::debug!(
            item_count = self.item_count,
            failure_count = self.failure_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fan_out_completed",
            span_name = name,
            item_count = self.item_count,
            failure_count = self.failure_count,
        )
    }
}

/// One fan-out item failed. Isolated; other items are unaffected.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct FanOutItemFailed<'a> {
    pub index: usize,
    pub message: &'a str,
}

impl Display for FanOutItemFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Fan-out item {} failed: {}", self.index, self.message)
    }
}

impl StructuredLog for FanOutItemFailed<'_> {
    fn log(&self) {
        tracing::warn!(index = self.index, error = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("fan_out_item_failed", span_name = name, index = self.index)
    }
}

/// An operation was timed.
///
/// # Log Level
/// `trace!` - Emitted once per timed operation
pub struct OperationTimed<'a> {
    pub name: &'a str,
    pub duration: std::time::Duration,
}

impl Display for OperationTimed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Operation '{}' took {:?}", self.name, self.duration)
    }
}

impl StructuredLog for OperationTimed<'_> {
    fn log(&self) {
        tracing::trace!(
            operation = self.name,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("operation", span_name = name, operation = self.name)
    }
}
