use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::config::StepOptions;
use crate::data::{DataPath, ExecutionResult, PipelineData};
use crate::engine::ProcessorContext;

/// Registry key of a processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessorId(String);

impl ProcessorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProcessorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProcessorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Data a processor consumes and produces, declared statically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoContract {
    #[serde(default)]
    pub requires: Vec<DataPath>,
    #[serde(default)]
    pub produces: Vec<DataPath>,
}

impl IoContract {
    pub fn new(requires: Vec<DataPath>, produces: Vec<DataPath>) -> Self {
        Self { requires, produces }
    }
}

/// A single, registrable processing unit.
///
/// `execute` receives the data bag by shared reference and returns a delta;
/// it never mutates the bag. Returning `Err` (or panicking) is treated by the
/// runner exactly like `ExecutionResult::failure` with the error's message.
#[async_trait]
pub trait Processor: Send + Sync {
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    fn io(&self) -> &IoContract;

    async fn execute(
        &self,
        ctx: &ProcessorContext,
        data: &PipelineData,
        options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult>;
}
