/// Fallback fan-out concurrency when neither config nor the host says otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Frames emitted by `sample_frames` when no `frame_count` option is given.
pub const DEFAULT_FRAME_COUNT: u64 = 8;
/// Spacing between sampled frames, in milliseconds.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 500;
/// Upper bound on `frame_count` for a single `sample_frames` step.
pub const MAX_FRAME_COUNT: u64 = 10_000;
