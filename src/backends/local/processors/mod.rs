// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod sample_frames;
pub mod score_frames;
pub mod select_best_frame;

pub use sample_frames::*;
pub use score_frames::*;
pub use select_best_frame::*;

use serde_json::Value;

use crate::config::StepOptions;

/// Field holding the frame records inside the `frames` object.
pub const FRAME_ITEMS_KEY: &str = "items";
/// Field holding per-frame scores inside the `frames` object.
pub const FRAME_SCORES_KEY: &str = "scores";

/// Frame records of a `frames` value.
///
/// Accepts both the `{ "items": [...] }` object written by `sample_frames`
/// and a bare list, which is what legacy payloads carry after boundary
/// normalization.
pub fn frame_items(frames: &Value) -> Option<&Vec<Value>> {
    match frames {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get(FRAME_ITEMS_KEY)?.as_array(),
        _ => None,
    }
}

/// An unsigned integer step option, or `default` when absent.
///
/// # Errors
/// When the option is present but not a non-negative integer.
pub(crate) fn u64_option(
    options: Option<&StepOptions>,
    key: &str,
    default: u64,
) -> anyhow::Result<u64> {
    match options.and_then(|o| o.get(key)) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("option '{}' must be a non-negative integer, got {}", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_items_accepts_both_shapes() {
        assert_eq!(frame_items(&json!([1, 2])).map(|v| v.len()), Some(2));
        assert_eq!(
            frame_items(&json!({ "items": [1, 2, 3] })).map(|v| v.len()),
            Some(3)
        );
        assert!(frame_items(&json!("frames")).is_none());
    }

    #[test]
    fn test_u64_option() {
        let mut options = StepOptions::new();
        options.insert("frame_count".to_string(), json!(12));
        options.insert("bad".to_string(), json!("twelve"));

        assert_eq!(u64_option(Some(&options), "frame_count", 8).unwrap(), 12);
        assert_eq!(u64_option(Some(&options), "missing", 8).unwrap(), 8);
        assert_eq!(u64_option(None, "frame_count", 8).unwrap(), 8);
        assert!(u64_option(Some(&options), "bad", 8).is_err());
    }
}
