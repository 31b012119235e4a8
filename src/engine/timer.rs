// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pass-through timing instrumentation.
//!
//! [`OperationTimer`] wraps one async operation, records how long it took under
//! a name and optional attributes, and hands back the operation's output
//! untouched. Errors are returned exactly as the operation produced them; the
//! entry is recorded either way, and a panicking operation is recorded before
//! the panic resumes. There is no retry or circuit breaking here.

use futures::FutureExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::observability::messages::{fanout::OperationTimed, StructuredLog};

/// Free-form attributes attached to a timed operation.
pub type Attributes = BTreeMap<String, String>;

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationMetric {
    pub name: String,
    pub attributes: Attributes,
    pub duration: Duration,
}

impl OperationMetric {
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Aggregate of every entry recorded under one name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl MetricSummary {
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

/// Records operation durations. Shared as `Arc<OperationTimer>`; safe to use
/// from concurrent fan-out workers.
#[derive(Debug, Default)]
pub struct OperationTimer {
    metrics: Mutex<Vec<OperationMetric>>,
}

impl OperationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `operation` under `name` with no attributes.
    pub async fn time_operation<F, Fut, T>(&self, name: &str, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.time_operation_with(name, Attributes::new(), operation)
            .await
    }

    /// Time `operation` under `name`, recording `attributes` alongside.
    pub async fn time_operation_with<F, Fut, T>(
        &self,
        name: &str,
        attributes: Attributes,
        operation: F,
    ) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let start = Instant::now();
        let output = AssertUnwindSafe(operation()).catch_unwind().await;
        let duration = start.elapsed();

        OperationTimed { name, duration }.log();
        self.metrics.lock().await.push(OperationMetric {
            name: name.to_string(),
            attributes,
            duration,
        });

        match output {
            Ok(output) => output,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Every entry recorded so far, in recording order.
    pub async fn metrics(&self) -> Vec<OperationMetric> {
        self.metrics.lock().await.clone()
    }

    pub async fn reset(&self) {
        self.metrics.lock().await.clear();
    }

    /// Per-name aggregates, sorted by name.
    pub async fn summary(&self) -> Vec<MetricSummary> {
        let metrics = self.metrics.lock().await;
        let mut by_name: BTreeMap<&str, MetricSummary> = BTreeMap::new();

        for metric in metrics.iter() {
            by_name
                .entry(metric.name.as_str())
                .and_modify(|s| {
                    s.count += 1;
                    s.total += metric.duration;
                    s.min = s.min.min(metric.duration);
                    s.max = s.max.max(metric.duration);
                })
                .or_insert_with(|| MetricSummary {
                    name: metric.name.clone(),
                    count: 1,
                    total: metric.duration,
                    min: metric.duration,
                    max: metric.duration,
                });
        }

        by_name.into_values().collect()
    }
}
