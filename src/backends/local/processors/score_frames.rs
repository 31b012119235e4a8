use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{frame_items, u64_option, FRAME_ITEMS_KEY, FRAME_SCORES_KEY};
use crate::config::consts::DEFAULT_CONCURRENCY;
use crate::config::StepOptions;
use crate::data::{paths, DataDelta, ExecutionResult, PipelineData, METADATA_KEY};
use crate::engine::{parallel_map, Attributes, ProcessorContext};
use crate::traits::{IoContract, Processor, ProgressEvent};

/// Provider name recorded against the usage tracker, one unit per scored frame.
pub const SCORING_PROVIDER: &str = "frame_scoring";

/// Score Frames processor - scores every sampled frame with bounded fan-out
///
/// Each frame is scored independently; a frame that cannot be scored gets a
/// `null` score and is counted in `metadata.score_failures`. The step only
/// fails when no frame could be scored.
pub struct ScoreFramesProcessor {
    io: IoContract,
}

impl ScoreFramesProcessor {
    pub const ID: &'static str = "score_frames";

    pub fn new() -> Self {
        Self {
            io: IoContract::new(
                paths(["frames"]),
                paths(["frames.scores", "metadata.score_failures"]),
            ),
        }
    }

    /// Step option, then the job's effective config, then the default.
    fn concurrency(ctx: &ProcessorContext, options: Option<&StepOptions>) -> anyhow::Result<usize> {
        let from_config = ctx
            .config_value("concurrency")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_CONCURRENCY as u64);
        Ok(u64_option(options, "concurrency", from_config)? as usize)
    }
}

impl Default for ScoreFramesProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in for an external quality model: frames nearer a whole second
/// score higher.
fn score_frame(frame: &Value) -> Result<f64, String> {
    let timestamp_ms = frame
        .get("timestamp_ms")
        .and_then(Value::as_u64)
        .ok_or_else(|| "frame has no numeric 'timestamp_ms'".to_string())?;
    let offset = (timestamp_ms % 1000) as f64 / 1000.0;
    Ok(1.0 - offset.min(1.0 - offset))
}

#[async_trait]
impl Processor for ScoreFramesProcessor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "Score frames"
    }

    fn io(&self) -> &IoContract {
        &self.io
    }

    async fn execute(
        &self,
        ctx: &ProcessorContext,
        data: &PipelineData,
        options: Option<&StepOptions>,
    ) -> anyhow::Result<ExecutionResult> {
        let items = match data.get("frames").and_then(frame_items) {
            Some(items) if !items.is_empty() => items.clone(),
            Some(_) => return Ok(ExecutionResult::failure("no frames to score")),
            None => return Ok(ExecutionResult::failure("'frames' does not hold a frame list")),
        };
        let concurrency = Self::concurrency(ctx, options)?;
        let total = items.len();

        let progress = ctx.progress.clone();
        let timer = ctx.timer.clone();
        let completed = Arc::new(AtomicUsize::new(0));
        let processor_id = Self::ID;

        let outcome = parallel_map(
            items.clone(),
            move |frame: Value, index| {
                let progress = progress.clone();
                let timer = timer.clone();
                let completed = completed.clone();
                async move {
                    let mut attributes = Attributes::new();
                    attributes.insert("frame".to_string(), index.to_string());
                    let score = timer
                        .time_operation_with("score_frame", attributes, || async {
                            score_frame(&frame)
                        })
                        .await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress
                        .on_progress(ProgressEvent::Items {
                            processor_id: processor_id.to_string(),
                            completed: done,
                            total,
                        })
                        .await;
                    score
                }
            },
            concurrency,
        )
        .await?;

        if outcome.all_failed() {
            let first = outcome.failures().next().map(|(_, m)| m).unwrap_or("unknown");
            return Ok(ExecutionResult::failure(format!(
                "all {} frames failed to score (first error: {})",
                total, first
            )));
        }

        let failures = outcome.failure_count();
        ctx.record_usage(SCORING_PROVIDER, (total - failures) as u64);

        let scores: Vec<Value> = outcome
            .into_values()
            .into_iter()
            .map(|score| score.map_or(Value::Null, |s| json!(s)))
            .collect();

        let mut delta = DataDelta::new();
        delta.insert(
            "frames".to_string(),
            json!({ FRAME_ITEMS_KEY: items, FRAME_SCORES_KEY: scores }),
        );
        delta.insert(
            METADATA_KEY.to_string(),
            json!({ "score_failures": failures }),
        );
        Ok(ExecutionResult::success(delta))
    }
}
