use async_trait::async_trait;
use serde_json::{json, Value};

use super::{frame_items, FRAME_SCORES_KEY};
use crate::config::StepOptions;
use crate::data::{paths, DataDelta, ExecutionResult, PipelineData};
use crate::engine::ProcessorContext;
use crate::traits::{IoContract, Processor};

/// Select Best Frame processor - picks the highest-scoring frame
pub struct SelectBestFrameProcessor {
    io: IoContract,
}

impl SelectBestFrameProcessor {
    pub const ID: &'static str = "select_best_frame";

    pub fn new() -> Self {
        Self {
            io: IoContract::new(paths(["frames.scores"]), paths(["selected_frame"])),
        }
    }
}

impl Default for SelectBestFrameProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Index and score of the best frame. Ties go to the earliest frame; `null`
/// scores are skipped.
fn best_score(scores: &[Value]) -> Option<(usize, f64)> {
    scores
        .iter()
        .enumerate()
        .filter_map(|(index, score)| score.as_f64().map(|s| (index, s)))
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}

#[async_trait]
impl Processor for SelectBestFrameProcessor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "Select best frame"
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        _ctx: &ProcessorContext,
        data: &PipelineData,
        _options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        let scores = match data
            .get_path(&format!("frames.{}", FRAME_SCORES_KEY))
            .and_then(Value::as_array)
        {
            Some(scores) => scores,
            None => return Ok(ExecutionResult::failure("'frames.scores' is not a list")),
        };

        let Some((index, score)) = best_score(scores) else {
            return Ok(ExecutionResult::failure("no frame has a score"));
        };

        let frame = data
            .get("frames")
            .and_then(frame_items)
            .and_then(|items| items.get(index))
            .cloned()
            .unwrap_or(Value::Null);

        let mut delta = DataDelta::new();
        delta.insert(
            "selected_frame".to_string(),
            json!({ "index": index, "score": score, "frame": frame }),
        );
        Ok(ExecutionResult::success(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_table_driven() {
        struct TestCase {
            name: &'static str,
            scores: Value,
            expected: Option<(usize, f64)>,
        }

        let test_cases = vec![
            TestCase {
                name: "clear winner",
                scores: json!([0.2, 0.9, 0.4]),
                expected: Some((1, 0.9)),
            },
            TestCase {
                name: "ties go to the earliest frame",
                scores: json!([0.5, 0.8, 0.8]),
                expected: Some((1, 0.8)),
            },
            TestCase {
                name: "null scores are skipped",
                scores: json!([null, 0.1, null]),
                expected: Some((1, 0.1)),
            },
            TestCase {
                name: "nothing scored",
                scores: json!([null, null]),
                expected: None,
            },
        ];

        for tc in test_cases {
            let scores = tc.scores.as_array().unwrap();
            assert_eq!(best_score(scores), tc.expected, "case: {}", tc.name);
        }
    }

    #[tokio::test]
    async fn test_selects_frame_record() {
        let data = PipelineData::new().with(
            "frames",
            json!({
                "items": [{ "index": 0 }, { "index": 1, "timestamp_ms": 1000 }],
                "scores": [0.3, 1.0]
            }),
        );
        let ctx = ProcessorContext::new("job-test", std::env::temp_dir());

        let result = SelectBestFrameProcessor::new()
            .execute(&ctx, &data, None)
            .await
            .unwrap();

        let delta = result.data.unwrap();
        let selected = &delta["selected_frame"];
        assert_eq!(selected["index"], json!(1));
        assert_eq!(selected["frame"]["timestamp_ms"], json!(1000));
    }

    #[tokio::test]
    async fn test_missing_scores_fail() {
        let data = PipelineData::new().with("frames", json!({ "items": [] }));
        let ctx = ProcessorContext::new("job-test", std::env::temp_dir());

        let result = SelectBestFrameProcessor::new()
            .execute(&ctx, &data, None)
            .await
            .unwrap();
        assert!(!result.success);
    }
}
