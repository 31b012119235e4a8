// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared data model: data paths, the pipeline data bag and processor results.

pub mod boundary;
mod path;
mod pipeline_data;
mod result;

pub use path::{paths, DataPath, PATH_SEPARATOR};
pub use pipeline_data::{DataDelta, PipelineData, METADATA_KEY, SCHEMA_VERSION};
pub use result::ExecutionResult;
