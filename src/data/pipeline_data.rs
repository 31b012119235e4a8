// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The accumulating data bag threaded through a stack execution.
//!
//! `PipelineData` is owned by the runner for the whole execution. Processors
//! only ever see `&PipelineData` and express their output as a [`DataDelta`],
//! which the runner folds in with [`PipelineData::merge`].
//!
//! # Merge rules
//!
//! * Top-level keys in the delta overwrite keys in the bag.
//! * The `metadata` key is the shared envelope: when both sides hold an object
//!   it is merged shallowly (delta sub-keys win, all other sub-keys are kept).
//!   Any other combination falls back to overwrite.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::path::{DataPath, PATH_SEPARATOR};

/// Current version of the normalized pipeline data schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level key holding the shared metadata envelope.
pub const METADATA_KEY: &str = "metadata";

/// The delta returned by a processor. Keys are top-level field names.
pub type DataDelta = Map<String, Value>;

/// Normalized, versioned pipeline data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineData {
    schema_version: u32,
    fields: Map<String, Value>,
}

impl Default for PipelineData {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineData {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            fields: Map::new(),
        }
    }

    /// Create a bag from already-normalized fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            fields,
        }
    }

    /// Builder: set a top-level field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Resolve a dotted path by walking nested JSON objects.
    ///
    /// ```
    /// use framestack::data::PipelineData;
    /// use serde_json::json;
    ///
    /// let data = PipelineData::new().with("metadata", json!({ "source": { "fps": 24 } }));
    /// assert_eq!(data.get_path("metadata.source.fps"), Some(&json!(24)));
    /// assert_eq!(data.get_path("metadata.missing"), None);
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &DataPath) -> bool {
        self.get_path(path.as_str()).is_some()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every path present in the bag: each top-level key plus a dotted path
    /// for every key of every nested object.
    pub fn paths(&self) -> BTreeSet<DataPath> {
        let mut out = BTreeSet::new();
        for (key, value) in &self.fields {
            collect_paths(DataPath::new(key.clone()), value, &mut out);
        }
        out
    }

    /// Fold a processor delta into the bag.
    pub fn merge(&mut self, delta: DataDelta) {
        for (key, incoming) in delta {
            if key == METADATA_KEY {
                if let Value::Object(sub) = incoming {
                    if let Some(Value::Object(existing)) = self.fields.get_mut(&key) {
                        existing.extend(sub);
                    } else {
                        self.fields.insert(key, Value::Object(sub));
                    }
                    continue;
                }
            }
            self.fields.insert(key, incoming);
        }
    }

    /// Output boundary: the bag as a plain JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

fn collect_paths(path: DataPath, value: &Value, out: &mut BTreeSet<DataPath>) {
    if let Value::Object(map) = value {
        for (key, child) in map {
            collect_paths(path.join(key), child, out);
        }
    }
    out.insert(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delta(value: Value) -> DataDelta {
        match value {
            Value::Object(map) => map,
            _ => panic!("delta must be an object"),
        }
    }

    #[test]
    fn test_new_bag_carries_current_schema_version() {
        let data = PipelineData::new();
        assert_eq!(data.schema_version(), SCHEMA_VERSION);
        assert!(data.is_empty());
    }

    #[test]
    fn test_merge_overwrites_top_level_keys() {
        let mut data = PipelineData::new().with("a", 1).with("b", "old");
        data.merge(delta(json!({ "b": "new", "c": true })));

        assert_eq!(data.get("a"), Some(&json!(1)));
        assert_eq!(data.get("b"), Some(&json!("new")));
        assert_eq!(data.get("c"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_extends_metadata_shallowly() {
        let mut data = PipelineData::new().with(
            "metadata",
            json!({ "fps": 24, "source": { "codec": "h264" } }),
        );
        data.merge(delta(json!({
            "metadata": { "fps": 30, "frame_count": 12, "source": { "width": 1920 } }
        })));

        let metadata = data.get("metadata").unwrap();
        assert_eq!(metadata["fps"], json!(30));
        assert_eq!(metadata["frame_count"], json!(12));
        // Shallow: nested objects under metadata are replaced, not merged.
        assert_eq!(metadata["source"], json!({ "width": 1920 }));
    }

    #[test]
    fn test_merge_metadata_into_non_object_replaces() {
        let mut data = PipelineData::new().with("metadata", "legacy");
        data.merge(delta(json!({ "metadata": { "fps": 30 } })));
        assert_eq!(data.get("metadata"), Some(&json!({ "fps": 30 })));
    }

    #[test]
    fn test_non_metadata_objects_are_replaced() {
        let mut data = PipelineData::new().with("frames", json!({ "count": 2, "fps": 24 }));
        data.merge(delta(json!({ "frames": { "count": 3 } })));
        assert_eq!(data.get("frames"), Some(&json!({ "count": 3 })));
    }

    #[test]
    fn test_paths_include_nested_object_keys() {
        let data = PipelineData::new()
            .with("video", "/tmp/in.mp4")
            .with("metadata", json!({ "source": { "fps": 24 } }))
            .with("frames", json!([{ "index": 0 }]));

        let paths: Vec<String> = data.paths().into_iter().map(|p| p.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "frames",
                "metadata",
                "metadata.source",
                "metadata.source.fps",
                "video"
            ]
        );
    }

    #[test]
    fn test_get_path_does_not_descend_into_arrays() {
        let data = PipelineData::new().with("frames", json!([{ "scores": 1 }]));
        assert!(data.get_path("frames.scores").is_none());
        assert!(data.contains(&DataPath::new("frames")));
    }
}
