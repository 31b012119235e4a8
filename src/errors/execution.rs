// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{ContractError, RegistryError};

/// Configuration errors that stop a stack before any step runs.
///
/// Step failures never surface here; they are reported through
/// `StackOutcome::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}
