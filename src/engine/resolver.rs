// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Static IO-contract resolution for stacks.
//!
//! The resolver never executes a processor; it only compares declared
//! [`DataPath`]s as opaque strings. Producing `frames` does not imply
//! producing `frames.scores`, or the reverse.
//!
//! # Required-inputs rule
//!
//! A stack's required inputs are the `requires` of its **first** step: that is
//! the only point at which nothing has been produced yet. Later steps are
//! checked by [`IoContractResolver::lint`], which reports but never rejects.

use std::collections::HashSet;
use std::fmt;

use crate::data::DataPath;
use crate::engine::stack::Stack;
use crate::errors::ContractError;
use crate::traits::ProcessorId;

/// Result of validating a stack against the inputs available to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    /// Unmet required paths, in declaration order.
    pub missing: Vec<DataPath>,
}

/// A later step requires paths that neither the initial inputs nor any
/// earlier step provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractWarning {
    pub step_index: usize,
    pub processor_id: ProcessorId,
    pub missing: Vec<DataPath>,
}

impl fmt::Display for ContractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(|p| p.as_str()).collect();
        write!(
            f,
            "step {} ('{}') requires [{}] which no earlier step produces",
            self.step_index,
            self.processor_id,
            missing.join(", ")
        )
    }
}

/// Computes a stack's net required inputs and produced outputs.
pub struct IoContractResolver;

impl IoContractResolver {
    /// The `requires` of the first step, deduplicated, in declaration order.
    ///
    /// # Errors
    /// `ContractError::EmptyStack` when the stack has no steps.
    pub fn required_inputs(stack: &Stack) -> Result<Vec<DataPath>, ContractError> {
        let first = stack.steps().first().ok_or_else(|| ContractError::EmptyStack {
            stack_id: stack.id().to_string(),
        })?;
        Ok(dedup(first.processor.io().requires.iter()))
    }

    /// Union of every step's `produces`, in first-seen order.
    ///
    /// # Errors
    /// `ContractError::EmptyStack` when the stack has no steps.
    pub fn produced_outputs(stack: &Stack) -> Result<Vec<DataPath>, ContractError> {
        ensure_not_empty(stack)?;
        Ok(dedup(
            stack
                .steps()
                .iter()
                .flat_map(|s| s.processor.io().produces.iter()),
        ))
    }

    /// Valid iff every required input is in `available`.
    ///
    /// ```
    /// use std::collections::HashSet;
    /// use std::sync::Arc;
    /// use framestack::backends::stub::StubProcessor;
    /// use framestack::data::{paths, DataPath};
    /// use framestack::engine::{IoContractResolver, ResolvedStep, Stack};
    ///
    /// let sample = StubProcessor::new("sample").with_contract(paths(["video"]), paths(["frames"]));
    /// let stack = Stack::from_steps("s", "S", vec![ResolvedStep::new(Arc::new(sample))]);
    ///
    /// let available: HashSet<DataPath> = HashSet::new();
    /// let report = IoContractResolver::validate(&stack, &available).unwrap();
    /// assert!(!report.valid);
    /// assert_eq!(report.missing, paths(["video"]));
    /// ```
    pub fn validate<'a, I>(stack: &Stack, available: I) -> Result<ValidationReport, ContractError>
    where
        I: IntoIterator<Item = &'a DataPath>,
    {
        let required = Self::required_inputs(stack)?;
        let available: HashSet<&str> = available.into_iter().map(|p| p.as_str()).collect();

        let missing: Vec<DataPath> = required
            .into_iter()
            .filter(|p| !available.contains(p.as_str()))
            .collect();

        Ok(ValidationReport {
            valid: missing.is_empty(),
            missing,
        })
    }

    /// Walk the stack cumulatively and report later steps whose requirements
    /// nothing upstream declares. The first step is covered by [`validate`].
    ///
    /// [`validate`]: IoContractResolver::validate
    pub fn lint<'a, I>(stack: &Stack, available: I) -> Result<Vec<ContractWarning>, ContractError>
    where
        I: IntoIterator<Item = &'a DataPath>,
    {
        ensure_not_empty(stack)?;
        let mut known: HashSet<String> = available
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect();
        let mut warnings = Vec::new();

        for (step_index, step) in stack.steps().iter().enumerate() {
            let io = step.processor.io();
            if step_index > 0 {
                let missing: Vec<DataPath> = dedup(io.requires.iter())
                    .into_iter()
                    .filter(|p| !known.contains(p.as_str()))
                    .collect();
                if !missing.is_empty() {
                    warnings.push(ContractWarning {
                        step_index,
                        processor_id: ProcessorId::new(step.processor.id()),
                        missing,
                    });
                }
            }
            known.extend(io.produces.iter().map(|p| p.as_str().to_string()));
        }

        Ok(warnings)
    }
}

fn ensure_not_empty(stack: &Stack) -> Result<(), ContractError> {
    if stack.is_empty() {
        return Err(ContractError::EmptyStack {
            stack_id: stack.id().to_string(),
        });
    }
    Ok(())
}

fn dedup<'a>(paths: impl Iterator<Item = &'a DataPath>) -> Vec<DataPath> {
    let mut seen = HashSet::new();
    paths
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}
