// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod registry;
mod stack;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use loader::{load_and_validate_config, load_config, parse_config, Config, RunnerOptions};
pub use registry::ProcessorRegistry;
pub use stack::{StackTemplate, Step, StepOptions};
