// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor backends for framestack.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process Rust processors for the frame-selection demo stack:
//! - **sample_frames**: video reference to evenly spaced frame records
//! - **score_frames**: bounded fan-out scoring of every frame
//! - **select_best_frame**: picks the highest-scoring frame
//!
//! ## Stub Backend
//! Test doubles for runner and registry tests:
//! - **StubProcessor**: configurable contract and fixed delta; records calls
//! - **FailingProcessor**: reports a failure or returns an error
//! - **PanickingProcessor**: panics inside `execute`
//!
//! # Example
//! ```rust
//! use framestack::backends::local::LocalProcessorFactory;
//! use framestack::config::ProcessorRegistry;
//!
//! let mut registry = ProcessorRegistry::new();
//! LocalProcessorFactory::register_all(&mut registry)?;
//! assert!(registry.contains("score_frames"));
//! # Ok::<(), framestack::errors::RegistryError>(())
//! ```

pub mod local;
pub mod stub;
