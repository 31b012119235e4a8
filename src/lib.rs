// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // processor backends
pub mod config;     // config, stack templates + registry
pub mod data;       // pipeline data bag and boundary translation
pub mod engine;     // resolver, runner, fan-out
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // processor + progress abstractions
