//! WAV reading and writing for the transcription pipeline.
//!
//! The source recording may arrive at any rate and channel count; it is
//! normalized here to 16-bit mono at the target sample rate. Chunk
//! artifacts are written and re-read strictly as mono; the decode side
//! re-validates instead of trusting the segmenter, since chunk production
//! and decoding may be decoupled.

use crate::error::{Result, TapescriptError};
use std::io;
use std::path::Path;

/// Mono audio read back from a chunk artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// Read a WAV file and normalize it to mono at `target_rate`.
///
/// Multi-channel input is downmixed by averaging across channels; other
/// rates are resampled by linear interpolation.
pub fn read_normalized(path: &Path, target_rate: u32) -> Result<Vec<i16>> {
    let mut reader = hound::WavReader::open(path).map_err(|e| wav_error(path, e))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(TapescriptError::UnsupportedFormat {
            message: format!("{} declares zero channels", path.display()),
        });
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(TapescriptError::UnsupportedFormat {
            message: format!(
                "{} is {}-bit {:?}; only 16-bit integer PCM is supported",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            ),
        });
    }

    let raw: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| wav_error(path, e))?;

    let mono = downmix_to_mono(&raw, spec.channels);
    if spec.sample_rate == target_rate {
        Ok(mono)
    } else {
        Ok(resample(&mono, spec.sample_rate, target_rate))
    }
}

/// Read a chunk artifact, requiring it to be single-channel.
///
/// Returns a `Format` error if the file is not mono. The sample rate is
/// returned as-is so the caller can open a decode session at the rate the
/// artifact actually has.
pub fn read_mono_chunk(path: &Path) -> Result<ChunkAudio> {
    let mut reader = hound::WavReader::open(path).map_err(|e| wav_error(path, e))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(TapescriptError::Format {
            path: path.display().to_string(),
            message: format!("expected mono, got {} channels", spec.channels),
        });
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| wav_error(path, e))?;

    Ok(ChunkAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write mono 16-bit PCM samples to a WAV file.
pub fn write_mono_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| wav_error(path, e))?;
    for &sample in samples {
        writer.write_sample(sample).map_err(|e| wav_error(path, e))?;
    }
    writer.finalize().map_err(|e| wav_error(path, e))?;
    Ok(())
}

/// Duration in milliseconds of `sample_count` mono samples at `rate`.
pub fn duration_ms(sample_count: usize, rate: u32) -> u64 {
    (sample_count as u64 * 1000) / rate as u64
}

/// Map a hound error onto the crate taxonomy: I/O failures stay I/O
/// errors, everything else means the container could not be parsed.
fn wav_error(path: &Path, e: hound::Error) -> TapescriptError {
    match e {
        hound::Error::IoError(io_err) => TapescriptError::Io(io_err),
        other => TapescriptError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), other),
        )),
    }
}

/// Downmix interleaved multi-channel samples by averaging across channels.
fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
