// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while resolving a stack's IO contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A stack must contain at least one step.
    #[error("Stack '{stack_id}' has no steps; a stack must contain at least one processor")]
    EmptyStack { stack_id: String },
}
