// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` so call sites
//! never carry log strings of their own. Each message also implements
//! [`messages::StructuredLog`], which emits the event with structured fields at
//! the level the message documents.
//!
//! Messages are organized by subsystem:
//! * `messages::runner` - stack execution lifecycle and contract diagnostics
//! * `messages::processor` - individual processor calls
//! * `messages::fanout` - bounded fan-out and operation timing
//! * `messages::registry` - processor registration and template validation
//!
//! # Usage
//!
//! ```rust
//! use framestack::observability::messages::processor::ProcessorExecutionFailed;
//! use framestack::observability::messages::StructuredLog;
//!
//! let msg = ProcessorExecutionFailed {
//!     processor_id: "score_frames",
//!     step_index: 1,
//!     error: "provider returned 429",
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`]. Calling it twice is
/// harmless, the second installation is ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
