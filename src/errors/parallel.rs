// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised by the bounded fan-out primitive itself, never by an item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParallelMapError {
    /// The concurrency limit must be at least 1.
    #[error("Invalid concurrency limit {0}: at least one worker must be allowed in flight")]
    InvalidConcurrency(usize),

    /// The limiter's semaphore was closed while items were still queued.
    #[error("Concurrency limiter failed: {0}")]
    Internal(String),
}
