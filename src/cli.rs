//! Command-line interface for tapescript
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Transcribe, summarize, and extract key points from a long recording
#[derive(Parser, Debug)]
#[command(
    name = "tapescript",
    version,
    about = "Parallel chunked transcription for long-form audio"
)]
pub struct Cli {
    /// Source recording URL (prompted for interactively when omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: progress detail, -vv: full diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Chunk length for parallel decoding. Examples: 60s, 2m, 1m30s
    #[arg(long, short = 'c', value_name = "DURATION", default_value = "60s", value_parser = parse_chunk_length_ms)]
    pub chunk_length: u64,

    /// Number of concurrent decode workers
    #[arg(long, short = 'w', value_name = "N")]
    pub workers: Option<usize>,

    /// Directory for the downloaded source and chunk artifacts
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Write the transcript to a file as well as the console
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Recognizer model directory
    #[arg(long, value_name = "DIR")]
    pub model: Option<PathBuf>,

    /// Skip summary and key-point extraction
    #[arg(long)]
    pub no_summary: bool,

    /// Keep the source file and chunk artifacts after the run
    #[arg(long)]
    pub keep_artifacts: bool,

    /// Stop all workers at the first decode failure
    #[arg(long)]
    pub fail_fast: bool,
}

/// Parse a chunk length string into milliseconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`60s`, `2m`), and compound (`1m30s`).
fn parse_chunk_length_ms(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs * 1000);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| e.to_string())
}
