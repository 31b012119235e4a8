// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for processor registration and lookup.

use thiserror::Error;

use crate::traits::ProcessorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A processor with the same id is already registered.
    #[error("Processor '{0}' is already registered")]
    DuplicateId(ProcessorId),

    /// No processor is registered under the id.
    #[error("Processor '{0}' is not registered")]
    NotFound(ProcessorId),

    /// One or more templates reference unregistered processors.
    #[error("Stack '{template_id}' references unknown processors: {}", join_ids(.missing))]
    UnknownProcessors {
        template_id: String,
        missing: Vec<ProcessorId>,
    },
}

fn join_ids(ids: &[ProcessorId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
