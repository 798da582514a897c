//! Default configuration constants for tapescript.
//!
//! Shared across the config types and the pipeline so the same values are
//! never duplicated in two places.

/// Target audio sample rate in Hz.
///
/// 16kHz is the standard rate for speech recognition models and is what
/// every chunk artifact is normalized to before decoding.
pub const SAMPLE_RATE: u32 = 16_000;

/// Default chunk length in milliseconds.
///
/// One-minute chunks keep per-chunk decode latency bounded while leaving
/// enough context for the recognizer to finalize full utterances.
pub const CHUNK_LENGTH_MS: u64 = 60_000;

/// Default number of concurrent decode workers.
pub const WORKER_COUNT: usize = 5;

/// Samples fed to a decode session per frame.
///
/// The session may finalize a segment after any frame; smaller frames give
/// finer-grained finalization at the cost of more calls into the backend.
pub const FRAME_SAMPLES: usize = 4_000;

/// File name of the downloaded source recording inside the work directory.
pub const SOURCE_FILE_NAME: &str = "audio.wav";

/// Directory name for chunk artifacts inside the work directory.
pub const CHUNK_DIR_NAME: &str = "chunks";

/// Character budget per piece when splitting text for summarization.
///
/// The splitter is a plain character-count cut with no semantic boundary
/// guarantee; summarization backends cap their input length, so long
/// transcripts are summarized piecewise and the pieces joined.
pub const SUMMARY_CHAR_BUDGET: usize = 1024;

/// Summary length bounds (tokens, as interpreted by the backend).
pub const SUMMARY_MAX_LENGTH: usize = 50;
pub const SUMMARY_MIN_LENGTH: usize = 30;

/// Key-point extraction length bounds.
///
/// Wider than the summary preset: key points keep more of each piece.
pub const KEY_POINT_MAX_LENGTH: usize = 150;
pub const KEY_POINT_MIN_LENGTH: usize = 30;

/// Default endpoint for the hosted summarization model.
pub const SUMMARY_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/sshleifer/distilbart-cnn-12-6";
