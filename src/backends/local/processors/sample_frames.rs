use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use super::{u64_option, FRAME_ITEMS_KEY};
use crate::config::consts::{DEFAULT_FRAME_COUNT, DEFAULT_FRAME_INTERVAL_MS, MAX_FRAME_COUNT};
use crate::config::StepOptions;
use crate::data::{paths, DataDelta, ExecutionResult, PipelineData, METADATA_KEY};
use crate::engine::ProcessorContext;
use crate::traits::{IoContract, Processor};

/// Sample Frames processor - turns a video reference into evenly spaced frame records
pub struct SampleFramesProcessor {
    io: IoContract,
}

impl SampleFramesProcessor {
    pub const ID: &'static str = "sample_frames";

    pub fn new() -> Self {
        Self {
            io: IoContract::new(
                paths(["video"]),
                paths(["frames", "metadata.frame_count"]),
            ),
        }
    }
}

impl Default for SampleFramesProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    index: u64,
    timestamp_ms: u64,
    source: &'a str,
}

#[async_trait]
impl Processor for SampleFramesProcessor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "Sample frames"
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        _ctx: &ProcessorContext,
        data: &PipelineData,
        options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        let source = match data.get("video").and_then(Value::as_str) {
            Some(source) if !source.is_empty() => source,
            _ => return Ok(ExecutionResult::failure("'video' must be a non-empty string")),
        };

        let frame_count = u64_option(options, "frame_count", DEFAULT_FRAME_COUNT)?;
        if frame_count == 0 {
            return Ok(ExecutionResult::failure("frame_count must be at least 1"));
        }
        if frame_count > MAX_FRAME_COUNT {
            return Ok(ExecutionResult::failure(format!(
                "frame_count {} exceeds the limit of {}",
                frame_count, MAX_FRAME_COUNT
            )));
        }
        let interval_ms = u64_option(options, "interval_ms", DEFAULT_FRAME_INTERVAL_MS)?;
        // The last frame has the largest timestamp; if it fits, they all do.
        if (frame_count - 1).checked_mul(interval_ms).is_none() {
            return Ok(ExecutionResult::failure(format!(
                "{} frames at interval_ms {} overflow the timestamp range",
                frame_count, interval_ms
            )));
        }

        let frames = (0..frame_count)
            .map(|index| {
                serde_json::to_value(FrameRecord {
                    index,
                    timestamp_ms: index * interval_ms,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut delta = DataDelta::new();
        delta.insert("frames".to_string(), json!({ FRAME_ITEMS_KEY: frames }));
        delta.insert(
            METADATA_KEY.to_string(),
            json!({ "frame_count": frame_count }),
        );
        Ok(ExecutionResult::success(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ProcessorContext {
        ProcessorContext::new("job-test", std::env::temp_dir())
    }

    #[tokio::test]
    async fn test_defaults_produce_eight_frames() {
        let processor = SampleFramesProcessor::new();
        let data = PipelineData::new().with("video", "clip.mp4");

        let result = processor.execute(&ctx(), &data, None).await.unwrap();
        assert!(result.success);

        let delta = result.data.unwrap();
        let frames = delta["frames"][FRAME_ITEMS_KEY].as_array().unwrap();
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[3]["timestamp_ms"], json!(1500));
        assert_eq!(frames[0]["source"], json!("clip.mp4"));
        assert_eq!(delta[METADATA_KEY]["frame_count"], json!(8));
    }

    #[tokio::test]
    async fn test_options_table_driven() {
        struct TestCase {
            name: &'static str,
            options: Value,
            expected_count: Option<usize>,
            expected_last_ms: Option<u64>,
        }

        let test_cases = vec![
            TestCase {
                name: "custom count and interval",
                options: json!({ "frame_count": 3, "interval_ms": 100 }),
                expected_count: Some(3),
                expected_last_ms: Some(200),
            },
            TestCase {
                name: "zero frames is a failure",
                options: json!({ "frame_count": 0 }),
                expected_count: None,
                expected_last_ms: None,
            },
            TestCase {
                name: "frame count above the limit is a failure",
                options: json!({ "frame_count": MAX_FRAME_COUNT + 1 }),
                expected_count: None,
                expected_last_ms: None,
            },
            TestCase {
                name: "overflowing timestamps are a failure",
                options: json!({ "frame_count": 3, "interval_ms": u64::MAX }),
                expected_count: None,
                expected_last_ms: None,
            },
            TestCase {
                name: "a single frame never overflows",
                options: json!({ "frame_count": 1, "interval_ms": u64::MAX }),
                expected_count: Some(1),
                expected_last_ms: Some(0),
            },
        ];

        let processor = SampleFramesProcessor::new();
        let data = PipelineData::new().with("video", "clip.mp4");
        for tc in test_cases {
            let options = tc.options.as_object().unwrap().clone();
            let result = processor
                .execute(&ctx(), &data, Some(&options))
                .await
                .unwrap();

            match tc.expected_count {
                Some(count) => {
                    let delta = result.data.unwrap();
                    let frames = delta["frames"][FRAME_ITEMS_KEY].as_array().unwrap();
                    assert_eq!(frames.len(), count, "case: {}", tc.name);
                    assert_eq!(
                        frames[count - 1]["timestamp_ms"].as_u64(),
                        tc.expected_last_ms,
                        "case: {}",
                        tc.name
                    );
                }
                None => {
                    assert!(!result.success, "case: {}", tc.name);
                    assert!(result.error_message().contains("frame"), "case: {}", tc.name);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_option_is_an_error() {
        let processor = SampleFramesProcessor::new();
        let data = PipelineData::new().with("video", "clip.mp4");
        let options = json!({ "frame_count": "many" }).as_object().unwrap().clone();

        let err = processor
            .execute(&ctx(), &data, Some(&options))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("frame_count"));
    }

    #[tokio::test]
    async fn test_missing_video_fails() {
        let processor = SampleFramesProcessor::new();
        let result = processor
            .execute(&ctx(), &PipelineData::new(), None)
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error_message().contains("video"));
    }
}
