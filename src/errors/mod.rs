// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod boundary;
mod config;
mod contract;
mod execution;
mod parallel;
mod registry;

pub use boundary::BoundaryError;
pub use config::ConfigError;
pub use contract::ContractError;
pub use execution::StackError;
pub use parallel::ParallelMapError;
pub use registry::RegistryError;
