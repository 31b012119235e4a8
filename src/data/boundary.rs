// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input boundary translation of legacy data-bag fields.
//!
//! Older job payloads carry the frame list under more than one name. The engine
//! only ever sees the canonical `frames` field; everything else is folded in
//! here, before a [`PipelineData`] exists.
//!
//! Precedence when several representations are present is fixed:
//! `frames`, then `metadata.frames`, then `legacy_frames`. Consumed aliases are
//! removed from the bag whether or not they won.

use serde_json::{Map, Value};

use super::pipeline_data::{PipelineData, METADATA_KEY};
use crate::errors::BoundaryError;

/// Canonical field holding the frame list.
pub const FRAMES_KEY: &str = "frames";

/// Legacy top-level alias for the frame list.
pub const LEGACY_FRAMES_KEY: &str = "legacy_frames";

/// Normalize a raw job payload into canonical pipeline data.
///
/// ```
/// use framestack::data::boundary::normalize_legacy;
/// use serde_json::json;
///
/// let data = normalize_legacy(json!({ "video": "in.mp4", "legacy_frames": [1, 2] })).unwrap();
/// assert_eq!(data.get("frames"), Some(&json!([1, 2])));
/// assert!(data.get("legacy_frames").is_none());
/// ```
pub fn normalize_legacy(raw: Value) -> Result<PipelineData, BoundaryError> {
    let mut fields = match raw {
        Value::Object(map) => map,
        other => {
            return Err(BoundaryError {
                kind: json_kind(&other),
            })
        }
    };

    let legacy = fields.remove(LEGACY_FRAMES_KEY);
    let from_metadata = take_metadata_frames(&mut fields);

    if !fields.contains_key(FRAMES_KEY) {
        if let Some(frames) = from_metadata.or(legacy) {
            fields.insert(FRAMES_KEY.to_string(), frames);
        }
    }

    Ok(PipelineData::from_fields(fields))
}

fn take_metadata_frames(fields: &mut Map<String, Value>) -> Option<Value> {
    match fields.get_mut(METADATA_KEY) {
        Some(Value::Object(metadata)) => metadata.remove(FRAMES_KEY),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
