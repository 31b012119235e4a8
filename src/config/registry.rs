// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StackTemplate;
use crate::errors::RegistryError;
use crate::observability::messages::registry::{
    ProcessorRegistered, RegistryCleared, TemplatesValidated,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Processor, ProcessorId};

/// An explicit registry mapping processor ids to their implementations.
///
/// Callers construct one and hand it to the runner; there is no process-wide
/// instance. Registration is expected to finish before executions start, after
/// which the registry is only read (the runner holds it behind an `Arc`).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use framestack::backends::stub::StubProcessor;
/// use framestack::config::ProcessorRegistry;
///
/// let mut registry = ProcessorRegistry::new();
/// registry.register(Arc::new(StubProcessor::new("sample_frames"))).unwrap();
///
/// assert!(registry.contains("sample_frames"));
/// assert!(registry.register(Arc::new(StubProcessor::new("sample_frames"))).is_err());
/// assert!(registry.get("missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<ProcessorId, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor under its own id.
    ///
    /// # Errors
    /// `RegistryError::DuplicateId` if the id is taken; the existing
    /// registration is left untouched.
    pub fn register(&mut self, processor: Arc<dyn Processor>) -> Result<(), RegistryError> {
        let id = ProcessorId::new(processor.id());
        if self.processors.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        ProcessorRegistered {
            processor_id: id.as_str(),
            requires: processor.io().requires.len(),
            produces: processor.io().produces.len(),
        }
        .log();

        self.processors.insert(id, processor);
        Ok(())
    }

    /// Look up a processor.
    ///
    /// # Errors
    /// `RegistryError::NotFound` if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Processor>, RegistryError> {
        self.processors
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(ProcessorId::new(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.processors.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<ProcessorId> {
        let mut ids: Vec<ProcessorId> = self.processors.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Remove every registration. Intended for test isolation.
    pub fn clear(&mut self) {
        RegistryCleared {
            removed: self.processors.len(),
        }
        .log();
        self.processors.clear();
    }

    /// Check that every step of `template` names a registered processor.
    ///
    /// Reports every unknown id, in step order, not just the first.
    pub fn validate_template(&self, template: &StackTemplate) -> Result<(), RegistryError> {
        let mut missing: Vec<ProcessorId> = Vec::new();
        for id in template.processor_ids() {
            if !self.contains(id.as_str()) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::UnknownProcessors {
                template_id: template.id.clone(),
                missing,
            })
        }
    }

    /// Validate a batch of templates at startup, collecting every error.
    pub fn validate_templates(&self, templates: &[StackTemplate]) -> Result<(), Vec<RegistryError>> {
        let errors: Vec<RegistryError> = templates
            .iter()
            .filter_map(|t| self.validate_template(t).err())
            .collect();

        TemplatesValidated {
            template_count: templates.len(),
            error_count: errors.len(),
        }
        .log();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processor_count", &self.processors.len())
            .field("processor_ids", &self.ids())
            .finish()
    }
}
