pub mod context;
pub mod parallel_map;
pub mod resolver;
pub mod runner;
pub mod stack;
pub mod timer;

pub use context::{InMemoryUsage, ProcessorContext, UsageTracker};
pub use parallel_map::{parallel_map, ConcurrencyLimiter, ItemResult, ParallelMapResult};
pub use resolver::{ContractWarning, IoContractResolver, ValidationReport};
pub use runner::{
    FailedStep, RunState, StackFailure, StackOutcome, StackRunner, StepTiming, CANCELLED,
};
pub use stack::{ResolvedStep, Stack};
pub use timer::{Attributes, MetricSummary, OperationMetric, OperationTimer};
