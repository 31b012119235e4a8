// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stack execution lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Stack execution lifecycle (start, completion, failure, cancellation)
//! * Run state transitions
//! * Static IO contract validation and lint warnings
//! * Progress events forwarded by `TracingProgress`

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::data::DataPath;
use crate::engine::{ContractWarning, RunState};
use crate::observability::messages::StructuredLog;
use crate::traits::ProgressEvent;

/// Stack execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use framestack::observability::messages::runner::StackExecutionStarted;
///
/// let msg = StackExecutionStarted {
///     stack_id: "best-frame",
///     step_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct StackExecutionStarted<'a> {
    pub stack_id: &'a str,
    pub step_count: usize,
}

impl Display for StackExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting stack '{}' with {} steps",
            self.stack_id, self.step_count
        )
    }
}

impl StructuredLog for StackExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            stack_id = self.stack_id,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stack_execution",
            span_name = name,
            stack_id = self.stack_id,
            step_count = self.step_count,
        )
    }
}

/// Stack execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StackExecutionCompleted<'a> {
    pub stack_id: &'a str,
    pub step_count: usize,
    pub duration: std::time::Duration,
}

impl Display for StackExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stack '{}' completed: {} steps in {:?}",
            self.stack_id, self.step_count, self.duration
        )
    }
}

impl StructuredLog for StackExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            stack_id = self.stack_id,
            step_count = self.step_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stack_completed",
            span_name = name,
            stack_id = self.stack_id,
            step_count = self.step_count,
            duration = ?self.duration,
        )
    }
}

/// Stack execution halted at a failing step.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use framestack::observability::messages::runner::StackExecutionFailed;
///
/// let msg = StackExecutionFailed {
///     stack_id: "best-frame",
///     failed_at: Some("score_frames"),
///     error: "all 12 frames failed",
/// };
///
/// assert!(msg.to_string().contains("score_frames"));
/// ```
pub struct StackExecutionFailed<'a> {
    pub stack_id: &'a str,
    pub failed_at: Option<&'a str>,
    pub error: &'a str,
}

impl Display for StackExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.failed_at {
            Some(step) => write!(
                f,
                "Stack '{}' failed at '{}': {}",
                self.stack_id, step, self.error
            ),
            None => write!(f, "Stack '{}' failed: {}", self.stack_id, self.error),
        }
    }
}

impl StructuredLog for StackExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stack_id = self.stack_id,
            failed_at = self.failed_at,
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stack_failed",
            span_name = name,
            stack_id = self.stack_id,
            failed_at = self.failed_at,
            error = self.error,
        )
    }
}

/// The stack's required inputs are not all available.
///
/// # Log Level
/// `warn!` - The stack is rejected before any processor runs
pub struct StackValidationFailed<'a> {
    pub stack_id: &'a str,
    pub missing: &'a [DataPath],
}

impl Display for StackValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(|p| p.as_str()).collect();
        write!(
            f,
            "Stack '{}' is missing required inputs: [{}]",
            self.stack_id,
            missing.join(", ")
        )
    }
}

impl StructuredLog for StackValidationFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            stack_id = self.stack_id,
            missing_count = self.missing.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stack_validation_failed",
            span_name = name,
            stack_id = self.stack_id,
            missing_count = self.missing.len(),
        )
    }
}

/// A later step requires data nothing upstream declares.
///
/// # Log Level
/// `warn!` - Diagnostic only; execution proceeds
pub struct ContractWarningRaised<'a> {
    pub stack_id: &'a str,
    pub warning: &'a ContractWarning,
}

impl Display for ContractWarningRaised<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stack '{}': {}", self.stack_id, self.warning)
    }
}

impl StructuredLog for ContractWarningRaised<'_> {
    fn log(&self) {
        tracing::warn!(
            stack_id = self.stack_id,
            step_index = self.warning.step_index,
            processor_id = self.warning.processor_id.as_str(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "contract_warning",
            span_name = name,
            stack_id = self.stack_id,
            step_index = self.warning.step_index,
        )
    }
}

/// Run state transition.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct StackStateChanged<'a> {
    pub stack_id: &'a str,
    pub state: RunState,
}

impl Display for StackStateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stack '{}' is now {}", self.stack_id, self.state)
    }
}

impl StructuredLog for StackStateChanged<'_> {
    fn log(&self) {
        tracing::debug!(
            stack_id = self.stack_id,
            state = %self.state,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stack_state",
            span_name = name,
            stack_id = self.stack_id,
            state = %self.state,
        )
    }
}

/// Cancellation observed before a step started.
///
/// # Log Level
/// `info!` - Requested by the caller
pub struct StackCancelled<'a> {
    pub stack_id: &'a str,
    pub step_index: usize,
}

impl Display for StackCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stack '{}' cancelled before step {}",
            self.stack_id, self.step_index
        )
    }
}

impl StructuredLog for StackCancelled<'_> {
    fn log(&self) {
        tracing::info!(
            stack_id = self.stack_id,
            step_index = self.step_index,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stack_cancelled",
            span_name = name,
            stack_id = self.stack_id,
            step_index = self.step_index,
        )
    }
}

/// A progress event forwarded to the log.
///
/// # Log Level
/// `info!` for step boundaries, `debug!` for fan-out item counts
pub struct ProgressReported<'a> {
    pub event: &'a ProgressEvent,
}

impl Display for ProgressReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.event {
            ProgressEvent::StepStarted {
                display_name,
                step_index,
                total_steps,
                ..
            } => write!(f, "[{}/{}] {} started", step_index + 1, total_steps, display_name),
            ProgressEvent::StepCompleted {
                display_name,
                step_index,
                total_steps,
                elapsed,
                ..
            } => write!(
                f,
                "[{}/{}] {} completed in {:?}",
                step_index + 1,
                total_steps,
                display_name,
                elapsed
            ),
            ProgressEvent::StepFailed {
                processor_id,
                step_index,
                total_steps,
                error,
            } => write!(
                f,
                "[{}/{}] {} failed: {}",
                step_index + 1,
                total_steps,
                processor_id,
                error
            ),
            ProgressEvent::Items {
                processor_id,
                completed,
                total,
            } => write!(f, "{}: {}/{} items", processor_id, completed, total),
        }
    }
}

impl StructuredLog for ProgressReported<'_> {
    fn log(&self) {
        match self.event {
            ProgressEvent::Items { .. } => {
                tracing::debug!(processor_id = self.event.processor_id(), "{}", self)
            }
            _ => tracing::info!(processor_id = self.event.processor_id(), "{}", self),
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "progress",
            span_name = name,
            processor_id = self.event.processor_id(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_progress_display_uses_one_based_step_numbers() {
        let event = ProgressEvent::StepCompleted {
            processor_id: "sample_frames".to_string(),
            display_name: "Sample frames".to_string(),
            step_index: 0,
            total_steps: 3,
            elapsed: Duration::from_millis(5),
        };
        let text = ProgressReported { event: &event }.to_string();
        assert!(text.starts_with("[1/3] Sample frames completed"));
    }

    #[test]
    fn test_validation_message_lists_missing_paths() {
        let missing = vec![DataPath::new("video"), DataPath::new("frames")];
        let msg = StackValidationFailed {
            stack_id: "best-frame",
            missing: &missing,
        };
        assert_eq!(
            msg.to_string(),
            "Stack 'best-frame' is missing required inputs: [video, frames]"
        );
    }
}
