// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::ProcessorId;

/// Per-step options passed verbatim to the processor.
pub type StepOptions = Map<String, Value>;

/// One stack entry: a processor reference plus optional options.
///
/// # Example
/// ```yaml
/// processor: sample_frames
/// options:
///   frame_count: 12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "processor")]
    pub processor_id: ProcessorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<StepOptions>,
}

impl Step {
    pub fn new(processor_id: impl Into<ProcessorId>) -> Self {
        Self {
            processor_id: processor_id.into(),
            options: None,
        }
    }

    /// Builder: set one option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .get_or_insert_with(StepOptions::new)
            .insert(key.into(), value.into());
        self
    }
}

/// An ordered job recipe. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl StackTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Processor ids in step order.
    pub fn processor_ids(&self) -> impl Iterator<Item = &ProcessorId> {
        self.steps.iter().map(|s| &s.processor_id)
    }
}
