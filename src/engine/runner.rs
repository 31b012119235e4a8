// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential stack execution.
//!
//! The runner validates a stack against the caller's initial data, then runs
//! each step in declaration order, folding every step's delta into one
//! [`PipelineData`] bag. The first failing step halts the stack.
//!
//! # Error surface
//!
//! Only configuration problems (an unknown processor id, an empty stack)
//! come back as `Err(StackError)`, and always before any processor runs.
//! Everything that happens while steps run, including missing inputs,
//! processor errors, panics and cancellation, is reported as
//! [`StackOutcome::Failed`].

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{ProcessorRegistry, StackTemplate, StepOptions};
use crate::data::{DataDelta, DataPath, PipelineData};
use crate::engine::context::ProcessorContext;
use crate::engine::parallel_map::panic_message;
use crate::engine::resolver::IoContractResolver;
use crate::engine::stack::Stack;
use crate::errors::StackError;
use crate::observability::messages::processor::{
    ProcessorExecutionCompleted, ProcessorExecutionFailed, ProcessorExecutionStarted,
    ProcessorPanicked,
};
use crate::observability::messages::runner::{
    ContractWarningRaised, StackCancelled, StackExecutionCompleted, StackExecutionFailed,
    StackExecutionStarted, StackStateChanged, StackValidationFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Processor, ProcessorId, ProgressEvent};

/// Error message of a stack stopped by its cancellation token.
pub const CANCELLED: &str = "cancelled";

/// Lifecycle of one stack execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running { step_index: usize },
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Pending => write!(f, "pending"),
            RunState::Running { step_index } => write!(f, "running step {}", step_index),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Wall-clock time spent in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTiming {
    pub index: usize,
    pub processor_id: ProcessorId,
    pub elapsed: Duration,
}

/// The step a stack halted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedStep {
    pub index: usize,
    pub processor_id: ProcessorId,
}

/// Why and where a stack stopped.
#[derive(Debug, Clone)]
pub struct StackFailure {
    pub error: String,
    /// `None` when the stack was rejected before any step started.
    pub failed_at: Option<FailedStep>,
    /// Unmet required inputs, when validation rejected the stack.
    pub missing_inputs: Vec<DataPath>,
    /// The bag as it was before the failing step. A failing step's delta is
    /// never applied.
    pub data_before_failure: PipelineData,
    pub timings: Vec<StepTiming>,
}

/// Result of running a stack.
#[derive(Debug, Clone)]
pub enum StackOutcome {
    Completed {
        data: PipelineData,
        timings: Vec<StepTiming>,
    },
    Failed(StackFailure),
}

impl StackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StackOutcome::Completed { .. })
    }

    /// Final data on success, the pre-failure data otherwise.
    pub fn data(&self) -> &PipelineData {
        match self {
            StackOutcome::Completed { data, .. } => data,
            StackOutcome::Failed(failure) => &failure.data_before_failure,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StackOutcome::Completed { .. } => None,
            StackOutcome::Failed(failure) => Some(&failure.error),
        }
    }

    pub fn failure(&self) -> Option<&StackFailure> {
        match self {
            StackOutcome::Completed { .. } => None,
            StackOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn timings(&self) -> &[StepTiming] {
        match self {
            StackOutcome::Completed { timings, .. } => timings,
            StackOutcome::Failed(failure) => &failure.timings,
        }
    }
}

/// Runs stacks against an explicitly supplied registry.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use framestack::backends::stub::StubProcessor;
/// use framestack::config::{ProcessorRegistry, StackTemplate, Step};
/// use framestack::data::{paths, PipelineData};
/// use framestack::engine::{ProcessorContext, StackRunner};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut registry = ProcessorRegistry::new();
/// registry.register(Arc::new(
///     StubProcessor::new("sample")
///         .with_contract(paths(["video"]), paths(["frames"]))
///         .with_output("frames", json!([0, 1, 2])),
/// ))?;
///
/// let runner = StackRunner::new(Arc::new(registry));
/// let template = StackTemplate::new("demo", "Demo").with_step(Step::new("sample"));
/// let initial = PipelineData::new().with("video", "in.mp4");
/// let ctx = ProcessorContext::new("job-1", std::env::temp_dir());
///
/// let outcome = runner.execute(&template, initial, &ctx).await?;
/// assert!(outcome.is_success());
/// assert_eq!(outcome.data().get("frames"), Some(&json!([0, 1, 2])));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StackRunner {
    registry: Arc<ProcessorRegistry>,
}

impl StackRunner {
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Resolve `template` against the registry and run it.
    pub async fn execute(
        &self,
        template: &StackTemplate,
        initial: PipelineData,
        ctx: &ProcessorContext,
    ) -> Result<StackOutcome, StackError> {
        let stack = Stack::build(template, &self.registry)?;
        self.execute_stack(&stack, initial, ctx).await
    }

    /// Run an already-resolved stack.
    pub async fn execute_stack(
        &self,
        stack: &Stack,
        initial: PipelineData,
        ctx: &ProcessorContext,
    ) -> Result<StackOutcome, StackError> {
        let stack_id = stack.id();
        let total_steps = stack.len();
        transition(stack_id, RunState::Pending);

        let available = initial.paths();
        let report = IoContractResolver::validate(stack, &available)?;
        if !report.valid {
            StackValidationFailed {
                stack_id,
                missing: &report.missing,
            }
            .log();
            let error = missing_inputs_message(&report.missing);
            return Ok(fail(
                stack_id,
                StackFailure {
                    error,
                    failed_at: None,
                    missing_inputs: report.missing,
                    data_before_failure: initial,
                    timings: Vec::new(),
                },
            ));
        }

        for warning in IoContractResolver::lint(stack, &available)? {
            ContractWarningRaised {
                stack_id,
                warning: &warning,
            }
            .log();
        }

        StackExecutionStarted {
            stack_id,
            step_count: total_steps,
        }
        .log();

        let started = Instant::now();
        let mut data = initial;
        let mut timings = Vec::with_capacity(total_steps);

        for (step_index, step) in stack.steps().iter().enumerate() {
            let processor = step.processor.as_ref();
            let processor_id = processor.id();

            if ctx.cancellation.is_cancelled() {
                StackCancelled {
                    stack_id,
                    step_index,
                }
                .log();
                return Ok(fail(
                    stack_id,
                    StackFailure {
                        error: CANCELLED.to_string(),
                        failed_at: Some(failed_step(step_index, processor_id)),
                        missing_inputs: Vec::new(),
                        data_before_failure: data,
                        timings,
                    },
                ));
            }

            transition(stack_id, RunState::Running { step_index });
            ctx.report(ProgressEvent::StepStarted {
                processor_id: processor_id.to_string(),
                display_name: processor.display_name().to_string(),
                step_index,
                total_steps,
            })
            .await;
            ProcessorExecutionStarted {
                processor_id,
                step_index,
                input_fields: data.len(),
            }
            .log();

            let step_start = Instant::now();
            let result = ctx
                .timer
                .time_operation(processor_id, || {
                    invoke(processor, ctx, &data, step.options.as_ref())
                })
                .await;
            let elapsed = step_start.elapsed();
            timings.push(StepTiming {
                index: step_index,
                processor_id: ProcessorId::new(processor_id),
                elapsed,
            });

            let delta = match result {
                Ok(delta) => delta,
                Err(error) => {
                    ProcessorExecutionFailed {
                        processor_id,
                        step_index,
                        error: &error,
                    }
                    .log();
                    ctx.report(ProgressEvent::StepFailed {
                        processor_id: processor_id.to_string(),
                        step_index,
                        total_steps,
                        error: error.clone(),
                    })
                    .await;
                    return Ok(fail(
                        stack_id,
                        StackFailure {
                            error,
                            failed_at: Some(failed_step(step_index, processor_id)),
                            missing_inputs: Vec::new(),
                            data_before_failure: data,
                            timings,
                        },
                    ));
                }
            };

            ProcessorExecutionCompleted {
                processor_id,
                delta_fields: delta.len(),
                duration: elapsed,
            }
            .log();
            data.merge(delta);

            ctx.report(ProgressEvent::StepCompleted {
                processor_id: processor_id.to_string(),
                display_name: processor.display_name().to_string(),
                step_index,
                total_steps,
                elapsed,
            })
            .await;
        }

        transition(stack_id, RunState::Completed);
        StackExecutionCompleted {
            stack_id,
            step_count: total_steps,
            duration: started.elapsed(),
        }
        .log();

        Ok(StackOutcome::Completed { data, timings })
    }
}

/// Call one processor, folding errors, reported failures and panics into a
/// single error message.
async fn invoke(
    processor: &dyn Processor,
    ctx: &ProcessorContext,
    data: &PipelineData,
    options: Option<&StepOptions>,
) -> Result<DataDelta, String> {
    match AssertUnwindSafe(processor.execute(ctx, data, options))
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) if result.success => Ok(result.data.unwrap_or_default()),
        Ok(Ok(result)) => Err(result.error_message()),
        Ok(Err(error)) => Err(format!("{:#}", error)),
        Err(payload) => {
            let message = panic_message(payload);
            ProcessorPanicked {
                processor_id: processor.id(),
                message: &message,
            }
            .log();
            Err(message)
        }
    }
}

fn fail(stack_id: &str, failure: StackFailure) -> StackOutcome {
    StackExecutionFailed {
        stack_id,
        failed_at: failure.failed_at.as_ref().map(|s| s.processor_id.as_str()),
        error: &failure.error,
    }
    .log();
    transition(stack_id, RunState::Failed);
    StackOutcome::Failed(failure)
}

fn transition(stack_id: &str, state: RunState) {
    StackStateChanged { stack_id, state }.log();
}

fn failed_step(index: usize, processor_id: &str) -> FailedStep {
    FailedStep {
        index,
        processor_id: ProcessorId::new(processor_id),
    }
}

fn missing_inputs_message(missing: &[DataPath]) -> String {
    let missing: Vec<&str> = missing.iter().map(|p| p.as_str()).collect();
    format!("missing required inputs: [{}]", missing.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingProcessor, PanickingProcessor, StubProcessor};
    use crate::config::Step;
    use crate::data::paths;
    use crate::errors::{ContractError, RegistryError};
    use crate::traits::{ChannelProgress, FnProgress};
    use serde_json::json;

    fn ctx() -> ProcessorContext {
        ProcessorContext::new("job-test", std::env::temp_dir())
    }

    fn runner_with(processors: Vec<Arc<dyn Processor>>) -> StackRunner {
        let mut registry = ProcessorRegistry::new();
        for processor in processors {
            registry.register(processor).unwrap();
        }
        StackRunner::new(Arc::new(registry))
    }

    fn template(ids: &[&str]) -> StackTemplate {
        ids.iter()
            .fold(StackTemplate::new("test-stack", "Test"), |t, id| {
                t.with_step(Step::new(*id))
            })
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_any_processor_runs() {
        let sample = Arc::new(
            StubProcessor::new("sample").with_contract(paths(["video"]), paths(["frames"])),
        );
        let runner = runner_with(vec![sample.clone()]);

        let outcome = runner
            .execute(&template(&["sample"]), PipelineData::new(), &ctx())
            .await
            .unwrap();

        let failure = outcome.failure().unwrap();
        assert_eq!(failure.missing_inputs, paths(["video"]));
        assert!(failure.failed_at.is_none());
        assert!(failure.error.contains("video"));
        assert_eq!(sample.invocations(), 0);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let first = Arc::new(StubProcessor::new("first").with_output("a", 1));
        let third = Arc::new(StubProcessor::new("third"));
        let runner = runner_with(vec![
            first.clone(),
            Arc::new(FailingProcessor::new("second", "second step broke")),
            third.clone(),
        ]);

        let outcome = runner
            .execute(&template(&["first", "second", "third"]), PipelineData::new(), &ctx())
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some("second step broke"));
        let failure = outcome.failure().unwrap();
        assert_eq!(
            failure.failed_at,
            Some(FailedStep {
                index: 1,
                processor_id: ProcessorId::new("second"),
            })
        );
        assert_eq!(failure.data_before_failure.get("a"), Some(&json!(1)));
        assert_eq!(first.invocations(), 1);
        assert_eq!(third.invocations(), 0);
    }

    #[tokio::test]
    async fn test_later_steps_observe_merged_output() {
        let first = Arc::new(StubProcessor::new("first").with_output("a", 1));
        let second = Arc::new(StubProcessor::new("second").with_output("b", 2));
        let runner = runner_with(vec![first, second.clone()]);

        let outcome = runner
            .execute(&template(&["first", "second"]), PipelineData::new(), &ctx())
            .await
            .unwrap();

        let seen = second.last_seen().unwrap();
        assert_eq!(seen.get("a"), Some(&json!(1)));
        assert_eq!(outcome.data().get("a"), Some(&json!(1)));
        assert_eq!(outcome.data().get("b"), Some(&json!(2)));
        assert_eq!(outcome.timings().len(), 2);
    }

    #[tokio::test]
    async fn test_metadata_is_merged_shallowly_across_steps() {
        let runner = runner_with(vec![
            Arc::new(StubProcessor::new("first").with_output("metadata", json!({ "fps": 24 }))),
            Arc::new(
                StubProcessor::new("second").with_output("metadata", json!({ "frame_count": 8 })),
            ),
        ]);

        let outcome = runner
            .execute(&template(&["first", "second"]), PipelineData::new(), &ctx())
            .await
            .unwrap();

        assert_eq!(
            outcome.data().get("metadata"),
            Some(&json!({ "fps": 24, "frame_count": 8 }))
        );
    }

    #[tokio::test]
    async fn test_errors_and_panics_become_failures() {
        struct TestCase {
            name: &'static str,
            processor: Arc<dyn Processor>,
            expected_error: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "reported failure",
                processor: Arc::new(FailingProcessor::new("p", "no frames decoded")),
                expected_error: "no frames decoded",
            },
            TestCase {
                name: "returned error",
                processor: Arc::new(FailingProcessor::erroring("p", "upstream timed out")),
                expected_error: "upstream timed out",
            },
            TestCase {
                name: "panic",
                processor: Arc::new(PanickingProcessor::new("p", "index out of range")),
                expected_error: "panicked: index out of range",
            },
        ];

        for tc in test_cases {
            let runner = runner_with(vec![tc.processor]);
            let outcome = runner
                .execute(&template(&["p"]), PipelineData::new(), &ctx())
                .await
                .unwrap();
            assert_eq!(outcome.error(), Some(tc.expected_error), "case: {}", tc.name);
        }
    }

    #[tokio::test]
    async fn test_configuration_errors_are_returned_as_err() {
        let runner = runner_with(vec![Arc::new(StubProcessor::new("known"))]);

        let err = runner
            .execute(&template(&["known", "ghost"]), PipelineData::new(), &ctx())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StackError::Registry(RegistryError::NotFound(ProcessorId::new("ghost")))
        );

        let err = runner
            .execute(&template(&[]), PipelineData::new(), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StackError::Contract(ContractError::EmptyStack { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancellation_stops_before_next_step() {
        let second = Arc::new(StubProcessor::new("second"));
        let runner = runner_with(vec![Arc::new(StubProcessor::new("first")), second.clone()]);

        let ctx = ctx();
        let token = ctx.cancellation.clone();
        let ctx = ctx.with_progress(Arc::new(FnProgress::new(move |event| {
            if let ProgressEvent::StepCompleted { step_index: 0, .. } = event {
                token.cancel();
            }
        })));

        let outcome = runner
            .execute(&template(&["first", "second"]), PipelineData::new(), &ctx)
            .await
            .unwrap();

        assert_eq!(outcome.error(), Some(CANCELLED));
        assert_eq!(outcome.failure().unwrap().failed_at.as_ref().unwrap().index, 1);
        assert_eq!(second.invocations(), 0);
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let runner = runner_with(vec![
            Arc::new(StubProcessor::new("first")),
            Arc::new(FailingProcessor::new("second", "boom")),
        ]);
        let (sink, mut events) = ChannelProgress::channel();
        let ctx = ctx().with_progress(Arc::new(sink));

        runner
            .execute(&template(&["first", "second"]), PipelineData::new(), &ctx)
            .await
            .unwrap();
        drop(ctx);

        let mut kinds = Vec::new();
        while let Some(event) = events.recv().await {
            kinds.push(match event {
                ProgressEvent::StepStarted { step_index, .. } => format!("started:{}", step_index),
                ProgressEvent::StepCompleted { step_index, .. } => {
                    format!("completed:{}", step_index)
                }
                ProgressEvent::StepFailed { step_index, .. } => format!("failed:{}", step_index),
                ProgressEvent::Items { .. } => "items".to_string(),
            });
        }
        assert_eq!(
            kinds,
            vec!["started:0", "completed:0", "started:1", "failed:1"]
        );
    }

    #[tokio::test]
    async fn test_each_step_is_timed_under_its_processor_id() {
        let runner = runner_with(vec![
            Arc::new(StubProcessor::new("first")),
            Arc::new(StubProcessor::new("second")),
        ]);
        let ctx = ctx();

        runner
            .execute(&template(&["first", "second"]), PipelineData::new(), &ctx)
            .await
            .unwrap();

        let names: Vec<String> = ctx.timer.metrics().await.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Running { step_index: 2 }.to_string(), "running step 2");
        assert_eq!(RunState::Failed.to_string(), "failed");
    }
}
