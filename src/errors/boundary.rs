// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Raised when a raw job payload cannot become pipeline data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pipeline input must be a JSON object, got {kind}")]
pub struct BoundaryError {
    pub kind: &'static str,
}
