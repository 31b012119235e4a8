// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading and validating stack configuration files.

use std::path::PathBuf;
use thiserror::Error;

use super::RegistryError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Stack '{0}' has no steps")]
    EmptyTemplate(String),

    #[error("Duplicate stack id: '{0}'")]
    DuplicateTemplate(String),

    #[error("runner.default_concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("Unknown stack id: '{0}'")]
    UnknownTemplate(String),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<RegistryError>),
}

fn join_errors(errors: &[RegistryError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
