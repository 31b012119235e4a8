// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor registration and template validation.

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Processor registered.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ProcessorRegistered<'a> {
    pub processor_id: &'a str,
    pub requires: usize,
    pub produces: usize,
}

impl Display for ProcessorRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered processor '{}': requires {} paths, produces {} paths",
            self.processor_id, self.requires, self.produces
        )
    }
}

impl StructuredLog for ProcessorRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_id = self.processor_id,
            requires = self.requires,
            produces = self.produces,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor_registered",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}

/// Registry cleared.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct RegistryCleared {
    pub removed: usize,
}

impl Display for RegistryCleared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registry cleared: {} processors removed", self.removed)
    }
}

impl StructuredLog for RegistryCleared {
    fn log(&self) {
        tracing::debug!(removed = self.removed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("registry_cleared", span_name = name, removed = self.removed)
    }
}

/// Startup validation of stack templates against a registry.
///
/// # Log Level
/// `info!` when every template resolves, `error!` otherwise
///
/// # Example
/// ```
/// use framestack::observability::messages::registry::TemplatesValidated;
///
/// let msg = TemplatesValidated {
///     template_count: 3,
///     error_count: 0,
/// };
///
/// assert_eq!(msg.to_string(), "Validated 3 stack templates: 0 errors");
/// ```
pub struct TemplatesValidated {
    pub template_count: usize,
    pub error_count: usize,
}

impl Display for TemplatesValidated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Validated {} stack templates: {} errors",
            self.template_count, self.error_count
        )
    }
}

impl StructuredLog for TemplatesValidated {
    fn log(&self) {
        if self.error_count == 0 {
            tracing::info!(
                template_count = self.template_count,
                error_count = self.error_count,
                "{}", self
            );
        } else {
            tracing::error!(
                template_count = self.template_count,
                error_count = self.error_count,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "templates_validated",
            span_name = name,
            template_count = self.template_count,
        )
    }
}
