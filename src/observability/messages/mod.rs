// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable
//! output and [`StructuredLog`] for emitting it with structured fields.
//!
//! # Usage Pattern
//!
//! ```rust
//! use framestack::observability::messages::runner::StackExecutionStarted;
//! use framestack::observability::messages::StructuredLog;
//!
//! let msg = StackExecutionStarted {
//!     stack_id: "best-frame",
//!     step_count: 3,
//! };
//!
//! let span = msg.span("stack_execution");
//! let _guard = span.enter();
//! msg.log();
//! ```

pub mod fanout;
pub mod processor;
pub mod registry;
pub mod runner;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
