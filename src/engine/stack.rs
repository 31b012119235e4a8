// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{ProcessorRegistry, StackTemplate, StepOptions};
use crate::errors::RegistryError;
use crate::traits::Processor;

/// A step whose processor has been resolved from a registry.
#[derive(Clone)]
pub struct ResolvedStep {
    pub processor: Arc<dyn Processor>,
    pub options: Option<StepOptions>,
}

impl ResolvedStep {
    pub fn new(processor: Arc<dyn Processor>) -> Self {
        Self {
            processor,
            options: None,
        }
    }

    pub fn with_options(mut self, options: StepOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A stack template with every processor reference resolved.
///
/// Building a `Stack` is where unknown processor ids are caught, so a stack
/// that exists can always be executed without further lookups.
#[derive(Clone)]
pub struct Stack {
    id: String,
    name: String,
    steps: Vec<ResolvedStep>,
}

impl Stack {
    /// Resolve every step of `template` against `registry`.
    ///
    /// # Errors
    /// `RegistryError::NotFound` for the first step whose processor is not
    /// registered.
    pub fn build(
        template: &StackTemplate,
        registry: &ProcessorRegistry,
    ) -> Result<Self, RegistryError> {
        let steps = template
            .steps
            .iter()
            .map(|step| {
                Ok(ResolvedStep {
                    processor: registry.get(step.processor_id.as_str())?,
                    options: step.options.clone(),
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Ok(Self {
            id: template.id.clone(),
            name: template.name.clone(),
            steps,
        })
    }

    /// Assemble a stack from already-resolved steps.
    pub fn from_steps(
        id: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<ResolvedStep>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            steps,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("id", &self.id)
            .field("name", &self.name)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.processor.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
