// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::StepOptions;
use crate::data::{DataDelta, DataPath, ExecutionResult, PipelineData};
use crate::engine::ProcessorContext;
use crate::traits::{IoContract, Processor};

/// A configurable processor for tests and wiring checks.
///
/// Returns a fixed delta and remembers how often it ran and what it saw.
pub struct StubProcessor {
    id: String,
    io: IoContract,
    delta: DataDelta,
    invocations: AtomicUsize,
    last_seen: Mutex<Option<PipelineData>>,
}

impl StubProcessor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            io: IoContract::default(),
            delta: DataDelta::new(),
            invocations: AtomicUsize::new(0),
            last_seen: Mutex::new(None),
        }
    }

    pub fn with_contract(mut self, requires: Vec<DataPath>, produces: Vec<DataPath>) -> Self {
        self.io = IoContract::new(requires, produces);
        self
    }

    /// Add one field to the delta returned on every call.
    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.delta.insert(key.into(), value.into());
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// The data bag passed to the most recent call.
    pub fn last_seen(&self) -> Option<PipelineData> {
        match self.last_seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Processor for StubProcessor {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.id
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        _ctx: &ProcessorContext,
        data: &PipelineData,
        _options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        {
            let mut seen = match self.last_seen.lock() {
                Ok(seen) => seen,
                Err(poisoned) => poisoned.into_inner(),
            };
            *seen = Some(data.clone());
        }

        if self.delta.is_empty() {
            Ok(ExecutionResult::empty())
        } else {
            Ok(ExecutionResult::success(self.delta.clone()))
        }
    }
}

enum FailureMode {
    Reported,
    Errored,
}

/// A processor that always fails for testing failure scenarios
pub struct FailingProcessor {
    id: String,
    io: IoContract,
    message: String,
    mode: FailureMode,
}

impl FailingProcessor {
    /// Fails by returning `ExecutionResult::failure`.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            io: IoContract::default(),
            message: message.into(),
            mode: FailureMode::Reported,
        }
    }

    /// Fails by returning `Err` from `execute`.
    pub fn erroring(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            mode: FailureMode::Errored,
            ..Self::new(id, message)
        }
    }
}

#[async_trait]
impl Processor for FailingProcessor {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        "Failing"
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        _ctx: &ProcessorContext,
        _data: &PipelineData,
        _options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        match self.mode {
            FailureMode::Reported => Ok(ExecutionResult::failure(self.message.clone())),
            FailureMode::Errored => Err(anyhow::anyhow!("{}", self.message)),
        }
    }
}

/// A processor whose `execute` panics.
pub struct PanickingProcessor {
    id: String,
    io: IoContract,
    message: String,
}

impl PanickingProcessor {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            io: IoContract::default(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Processor for PanickingProcessor {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        "Panicking"
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        _ctx: &ProcessorContext,
        _data: &PipelineData,
        _options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        panic!("{}", self.message);
    }
}
