//! Splits a recording into fixed-length chunk artifacts on disk.
//!
//! The source is loaded once, normalized to mono at the target rate, then
//! sliced into `ceil(duration / chunk_length)` pieces. Each piece is
//! written as its own mono WAV named by position, so workers can read
//! their assignments independently.

use crate::audio::wav::{self, duration_ms};
use crate::error::{Result, TapescriptError};
use crate::pipeline::types::AudioChunk;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Maximum duration of each chunk, milliseconds.
    pub chunk_length_ms: u64,
    /// Sample rate every artifact is normalized to.
    pub sample_rate: u32,
    /// Directory chunk artifacts are written into (created if absent).
    pub chunk_dir: PathBuf,
}

/// Split `source` into ordered chunk artifacts under the chunk directory.
///
/// The returned list is ordered by ascending position, positions are dense
/// `[0, chunk_count)`, and the chunk durations sum to the source duration
/// exactly. The trailing chunk is always included, however short.
pub fn segment(source: &Path, config: &SegmentConfig) -> Result<Vec<AudioChunk>> {
    if config.chunk_length_ms == 0 {
        return Err(TapescriptError::ConfigInvalidValue {
            key: "chunk_length_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let samples = wav::read_normalized(source, config.sample_rate)?;
    let total_ms = duration_ms(samples.len(), config.sample_rate);
    let chunk_count = total_ms.div_ceil(config.chunk_length_ms) as usize;

    log::debug!(
        "segmenting {}: {} ms into {} chunk(s) of {} ms",
        source.display(),
        total_ms,
        chunk_count,
        config.chunk_length_ms
    );

    fs::create_dir_all(&config.chunk_dir)?;

    let samples_per_chunk =
        (config.chunk_length_ms * config.sample_rate as u64 / 1000) as usize;

    let mut chunks = Vec::with_capacity(chunk_count);
    for position in 0..chunk_count {
        let start_sample = position * samples_per_chunk;
        let end_sample = (start_sample + samples_per_chunk).min(samples.len());
        let slice = &samples[start_sample..end_sample];

        let path = config.chunk_dir.join(format!("chunk_{position}.wav"));
        wav::write_mono_wav(&path, slice, config.sample_rate)?;

        let start_ms = position as u64 * config.chunk_length_ms;
        chunks.push(AudioChunk {
            position,
            start_ms,
            duration_ms: (total_ms - start_ms).min(config.chunk_length_ms),
            path,
        });
    }

    Ok(chunks)
}
