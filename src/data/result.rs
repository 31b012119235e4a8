// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::pipeline_data::DataDelta;

/// Outcome of one processor call.
///
/// When `success` is false the runner ignores `data`. A processor that wants
/// to no-op returns [`ExecutionResult::empty`]; there is no separate skip
/// signal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(data: DataDelta) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful call that contributes nothing.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Builder: add one field to the delta.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(DataDelta::new)
            .insert(key.into(), value.into());
        self
    }

    /// The error message, or a generic one when the processor gave none.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "processor reported failure without a message".to_string())
    }
}
