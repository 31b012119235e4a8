// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution context handed to every processor in a stack run.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::engine::timer::OperationTimer;
use crate::traits::{NoopProgress, ProgressEvent, ProgressSink};

/// Records billable usage of external providers.
///
/// The engine never reads it; processors that call paid APIs record against
/// it when one is present.
pub trait UsageTracker: Send + Sync {
    fn record(&self, provider: &str, units: u64);
}

/// Usage totals per provider, kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryUsage {
    totals: Mutex<BTreeMap<String, u64>>,
}

impl InMemoryUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals(&self) -> BTreeMap<String, u64> {
        match self.totals.lock() {
            Ok(totals) => totals.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl UsageTracker for InMemoryUsage {
    fn record(&self, provider: &str, units: u64) {
        let mut totals = match self.totals.lock() {
            Ok(totals) => totals,
            Err(poisoned) => poisoned.into_inner(),
        };
        *totals.entry(provider.to_string()).or_insert(0) += units;
    }
}

/// Context passed to every processor during a stack execution.
///
/// The runner itself relies only on `progress`, `timer` and `cancellation`;
/// the remaining fields are for processors.
#[derive(Clone)]
pub struct ProcessorContext {
    /// Identifier of the job this execution belongs to.
    pub job_id: String,
    /// Scratch directory for intermediate artifacts.
    pub work_dir: PathBuf,
    /// Sink for progress events; may be called from concurrent workers.
    pub progress: Arc<dyn ProgressSink>,
    /// Per-job configuration after defaults and overrides were applied.
    pub effective_config: Value,
    pub timer: Arc<OperationTimer>,
    pub usage: Option<Arc<dyn UsageTracker>>,
    /// Checked by the runner before each step starts.
    pub cancellation: CancellationToken,
}

impl ProcessorContext {
    pub fn new(job_id: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            job_id: job_id.into(),
            work_dir: work_dir.into(),
            progress: Arc::new(NoopProgress),
            effective_config: Value::Object(Default::default()),
            timer: Arc::new(OperationTimer::new()),
            usage: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_config(mut self, effective_config: Value) -> Self {
        self.effective_config = effective_config;
        self
    }

    pub fn with_timer(mut self, timer: Arc<OperationTimer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn with_usage(mut self, usage: Arc<dyn UsageTracker>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub async fn report(&self, event: ProgressEvent) {
        self.progress.on_progress(event).await;
    }

    /// Look up a key in the effective config.
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.effective_config.get(key)
    }

    pub fn record_usage(&self, provider: &str, units: u64) {
        if let Some(usage) = &self.usage {
            usage.record(provider, units);
        }
    }
}

impl std::fmt::Debug for ProcessorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorContext")
            .field("job_id", &self.job_id)
            .field("work_dir", &self.work_dir)
            .field("effective_config", &self.effective_config)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}
