//! Data types for the chunked transcription pipeline.

use std::path::PathBuf;

/// One fixed-length slice of the source recording, normalized on disk.
///
/// Positions are dense and 0-based: the segmenter produces exactly
/// `[0, chunk_count)` with no gaps. Every chunk except possibly the last
/// spans the configured chunk length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    /// Ordinal position in the original recording.
    pub position: usize,
    /// Start offset in the source, milliseconds.
    pub start_ms: u64,
    /// Duration of this chunk, milliseconds.
    pub duration_ms: u64,
    /// Location of the normalized mono artifact.
    pub path: PathBuf,
}

/// Text decoded from one chunk, emitted exactly once by the owning worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub position: usize,
    pub text: String,
}

/// What the dispatcher does when one worker fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Surviving workers finish their own groups; the run is reported
    /// partial with the failed worker's remaining positions missing.
    #[default]
    BestEffort,
    /// The first failure raises a shared cancel flag; siblings stop at
    /// their next chunk boundary.
    FailFast,
}

/// A contained worker failure, reported after the join barrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    /// Worker identifier in `[0, worker_count)`.
    pub worker: usize,
    /// First position the worker did not produce a result for.
    pub position: usize,
    pub message: String,
}

/// Outcome of a dispatch run: the reassembled transcript plus everything
/// needed to report it as complete or partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Chunk texts joined in ascending position order.
    pub transcript: String,
    /// Positions that produced no result, ascending.
    pub missing: Vec<usize>,
    /// Per-worker failures, in worker order.
    pub failures: Vec<WorkerFailure>,
    /// Number of chunks that were dispatched.
    pub chunk_count: usize,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failures.is_empty()
    }
}
