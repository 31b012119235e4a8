// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded-concurrency fan-out with per-item failure isolation.
//!
//! Processors that call rate-limited external services (one request per video
//! frame, say) use [`parallel_map`] to keep at most `concurrency` calls in
//! flight. Scheduling is a sliding window: a permit is taken from a
//! `tokio::sync::Semaphore` *before* an item's task is spawned, and released
//! when that task finishes, so the next queued item starts as soon as any
//! in-flight item completes.
//!
//! # Guarantees
//!
//! * `results[i]` always belongs to `items[i]`, whatever the completion order.
//! * A failing item (an `Err` from the worker, or a panic) is recorded in its
//!   own slot and never cancels or affects any other item.
//! * The call returns only once every item is terminal. There is no
//!   early-exit mode; deciding whether "some failures" fail the step is the
//!   calling processor's business.
//! * A concurrency limit of `0` is rejected up front.
//!
//! # Example
//! ```
//! use framestack::engine::parallel_map;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = parallel_map(
//!     vec![1, 2, 3, 4, 5],
//!     |x: i32, _index| async move {
//!         if x == 3 {
//!             Err(format!("item {} rejected", x))
//!         } else {
//!             Ok(x * 2)
//!         }
//!     },
//!     2,
//! )
//! .await?;
//!
//! assert_eq!(outcome.len(), 5);
//! assert!(!outcome.results[2].is_ok());
//! assert_eq!(outcome.results[4].value(), Some(&10));
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::errors::ParallelMapError;
use crate::observability::messages::fanout::{FanOutCompleted, FanOutItemFailed, FanOutStarted};
use crate::observability::messages::StructuredLog;

/// Outcome of one item, tagged with its input index.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult<R> {
    pub index: usize,
    pub outcome: Result<R, String>,
}

impl<R> ItemResult<R> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&R> {
        self.outcome.as_ref().ok()
    }

    pub fn message(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(|m| m.as_str())
    }
}

/// Every item's outcome, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelMapResult<R> {
    pub results: Vec<ItemResult<R>>,
}

impl<R> ParallelMapResult<R> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = (usize, &R)> {
        self.results
            .iter()
            .filter_map(|r| r.value().map(|v| (r.index, v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.message().map(|m| (r.index, m)))
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_ok()).count()
    }

    /// True when there was at least one item and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| !r.is_ok())
    }

    /// Values by index, `None` in failed slots.
    pub fn into_values(self) -> Vec<Option<R>> {
        self.results.into_iter().map(|r| r.outcome.ok()).collect()
    }
}

/// A reusable concurrency limit for fan-out work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimiter {
    concurrency: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter allowing `concurrency` workers in flight.
    ///
    /// # Errors
    /// `ParallelMapError::InvalidConcurrency` when `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self, ParallelMapError> {
        if concurrency == 0 {
            return Err(ParallelMapError::InvalidConcurrency(concurrency));
        }
        Ok(Self { concurrency })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `worker` over `items` with at most `self.concurrency()` in flight.
    ///
    /// The worker receives each item together with its input index. Workers
    /// run as spawned tokio tasks, hence the `'static` bounds.
    pub async fn map<T, R, E, F, Fut>(
        &self,
        items: Vec<T>,
        worker: F,
    ) -> Result<ParallelMapResult<R>, ParallelMapError>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Display + Send + 'static,
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        let item_count = items.len();
        let start = Instant::now();
        FanOutStarted {
            item_count,
            concurrency: self.concurrency,
        }
        .log();

        // Capped by the item count and by tokio's permit limit.
        let permits = self
            .concurrency
            .min(item_count.max(1))
            .min(Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let worker = Arc::new(worker);
        let mut handles = Vec::with_capacity(item_count);

        for (index, item) in items.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ParallelMapError::Internal(e.to_string()))?;
            let worker = worker.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                worker(item, index).await.map_err(|e| e.to_string())
            }));
        }

        let mut results = Vec::with_capacity(item_count);
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) if join_error.is_panic() => {
                    Err(panic_message(join_error.into_panic()))
                }
                Err(join_error) => Err(join_error.to_string()),
            };

            if let Err(message) = &outcome {
                FanOutItemFailed { index, message }.log();
            }
            results.push(ItemResult { index, outcome });
        }

        let outcome = ParallelMapResult { results };
        FanOutCompleted {
            item_count,
            failure_count: outcome.failure_count(),
            duration: start.elapsed(),
        }
        .log();

        Ok(outcome)
    }
}

/// Run `worker` over `items` with at most `concurrency` invocations in flight.
///
/// See the module documentation for the ordering and isolation guarantees.
pub async fn parallel_map<T, R, E, F, Fut>(
    items: Vec<T>,
    worker: F,
    concurrency: usize,
) -> Result<ParallelMapResult<R>, ParallelMapError>
where
    T: Send + 'static,
    R: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(T, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    ConcurrencyLimiter::new(concurrency)?
        .map(items, worker)
        .await
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked with a non-string payload".to_string()
    }
}
