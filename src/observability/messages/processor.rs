// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor execution events.
//!
//! This module contains message types for logging events related to:
//! * Processor execution lifecycle (start, completion, failure)
//! * Panics caught at the step boundary

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Processor execution started.
///
/// # Log Level
/// `debug!` - The runner already reports step boundaries as progress
///
/// # Example
/// ```
/// use framestack::observability::messages::processor::ProcessorExecutionStarted;
///
/// let msg = ProcessorExecutionStarted {
///     processor_id: "sample_frames",
///     step_index: 0,
///     input_fields: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ProcessorExecutionStarted<'a> {
    pub processor_id: &'a str,
    pub step_index: usize,
    pub input_fields: usize,
}

impl Display for ProcessorExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution started at step {}: {} input fields",
            self.processor_id, self.step_index, self.input_fields
        )
    }
}

impl StructuredLog for ProcessorExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_id = self.processor_id,
            step_index = self.step_index,
            input_fields = self.input_fields,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "processor_execution",
            span_name = name,
            processor_id = self.processor_id,
            step_index = self.step_index,
        )
    }
}

/// Processor execution completed successfully.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ProcessorExecutionCompleted<'a> {
    pub processor_id: &'a str,
    pub delta_fields: usize,
    pub duration: std::time::Duration,
}

impl Display for ProcessorExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' completed: {} fields produced, duration={:?}",
            self.processor_id, self.delta_fields, self.duration
        )
    }
}

impl StructuredLog for ProcessorExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_id = self.processor_id,
            delta_fields = self.delta_fields,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor_completed",
            span_name = name,
            processor_id = self.processor_id,
            duration = ?self.duration,
        )
    }
}

/// Processor execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ProcessorExecutionFailed<'a> {
    pub processor_id: &'a str,
    pub step_index: usize,
    pub error: &'a str,
}

impl Display for ProcessorExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution failed at step {}: {}",
            self.processor_id, self.step_index, self.error
        )
    }
}

impl StructuredLog for ProcessorExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            processor_id = self.processor_id,
            step_index = self.step_index,
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "processor_failed",
            span_name = name,
            processor_id = self.processor_id,
            error = self.error,
        )
    }
}

/// A processor panicked; the panic was converted into a step failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ProcessorPanicked<'a> {
    pub processor_id: &'a str,
    pub message: &'a str,
}

impl Display for ProcessorPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' panicked: {}",
            self.processor_id, self.message
        )
    }
}

impl StructuredLog for ProcessorPanicked<'_> {
    fn log(&self) {
        tracing::error!(
            processor_id = self.processor_id,
            panic = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "processor_panicked",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}
