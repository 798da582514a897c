//! Parallel chunked transcription pipeline.
//!
//! Segmenter → ordered chunk list → Dispatcher → {Decode Worker}×N →
//! Collector → ordered transcript → Cleanup. The segmenter runs
//! single-threaded before any worker starts and cleanup runs
//! single-threaded after every worker has joined; the only write-shared
//! resource in between is the result sink.

pub mod cleanup;
pub mod collector;
pub mod dispatcher;
pub mod segmenter;
pub mod types;
mod worker;

pub use cleanup::{ArtifactGuard, cleanup_artifacts};
pub use collector::TranscriptCollector;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use segmenter::{SegmentConfig, segment};
pub use types::{AudioChunk, DecodeResult, FailureMode, RunOutcome, WorkerFailure};
