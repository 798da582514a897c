//! tapescript - parallel chunked transcription for long-form audio.
//!
//! Fetches a recording, splits it into fixed-length chunks, decodes the
//! chunks across a bounded worker pool, reassembles the transcript in
//! order, then summarizes it and extracts key points.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod console;
pub mod decode;
pub mod defaults;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod summarize;

// External collaborator seams (fetch → decode → summarize)
pub use decode::{DecodeSession, DecoderFactory, MockDecoderFactory};
pub use fetch::{HttpFetcher, MediaFetcher, MockFetcher};
pub use summarize::{MockSummarizer, RemoteSummarizer, Summarizer, SummaryParams};

// Pipeline
pub use pipeline::{
    ArtifactGuard, AudioChunk, DecodeResult, Dispatcher, DispatcherConfig, FailureMode,
    RunOutcome, SegmentConfig, TranscriptCollector, WorkerFailure, cleanup_artifacts, segment,
};

// Error handling
pub use error::{Result, TapescriptError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
        } else {
            assert!(!ver.contains('+'));
        }
    }
}
