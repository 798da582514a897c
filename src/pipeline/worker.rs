//! Decode worker: sequentially drives one decoding session per assigned
//! chunk and emits results to the shared sink.
//!
//! A worker owns the subsequence of positions `{ p : p mod N == id }` in
//! ascending order. The first error abandons its remaining chunks and is
//! surfaced to the dispatcher after the join barrier; other workers are
//! unaffected unless fail-fast mode raises the shared cancel flag.

use crate::audio::wav;
use crate::decode::DecoderFactory;
use crate::error::{Result, TapescriptError};
use crate::pipeline::types::{AudioChunk, DecodeResult, WorkerFailure};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) struct DecodeWorker {
    pub id: usize,
    pub chunks: Vec<AudioChunk>,
    pub factory: Arc<dyn DecoderFactory>,
    pub sink: Sender<DecodeResult>,
    pub cancel: Arc<AtomicBool>,
    pub fail_fast: bool,
    pub frame_samples: usize,
    pub target_rate: u32,
}

impl DecodeWorker {
    /// Process the assigned group to completion or first failure.
    pub fn run(self) -> std::result::Result<(), WorkerFailure> {
        for chunk in &self.chunks {
            if self.cancel.load(Ordering::SeqCst) {
                log::debug!(
                    "worker {} stopping at chunk {} after sibling failure",
                    self.id,
                    chunk.position
                );
                return Err(WorkerFailure {
                    worker: self.id,
                    position: chunk.position,
                    message: "cancelled after sibling failure".to_string(),
                });
            }

            match self.decode_chunk(chunk) {
                Ok(text) => {
                    log::debug!(
                        "worker {} decoded chunk {} ({} chars)",
                        self.id,
                        chunk.position,
                        text.len()
                    );
                    if self
                        .sink
                        .send(DecodeResult {
                            position: chunk.position,
                            text,
                        })
                        .is_err()
                    {
                        return Err(WorkerFailure {
                            worker: self.id,
                            position: chunk.position,
                            message: "result sink disconnected".to_string(),
                        });
                    }
                }
                Err(e) => {
                    if self.fail_fast {
                        self.cancel.store(true, Ordering::SeqCst);
                    }
                    return Err(WorkerFailure {
                        worker: self.id,
                        position: chunk.position,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Decode one chunk artifact through a fresh session.
    ///
    /// Finalized segments are concatenated in emission order with single
    /// spaces; the flush tail is appended last.
    fn decode_chunk(&self, chunk: &AudioChunk) -> Result<String> {
        let audio = wav::read_mono_chunk(&chunk.path)?;
        if audio.sample_rate != self.target_rate {
            log::debug!(
                "chunk {} is {} Hz, configured target is {} Hz",
                chunk.position,
                audio.sample_rate,
                self.target_rate
            );
        }

        let decode_err = |e: TapescriptError| TapescriptError::Decode {
            position: chunk.position,
            message: e.to_string(),
        };

        let mut session = self
            .factory
            .new_session(audio.sample_rate)
            .map_err(decode_err)?;
        let mut segments: Vec<String> = Vec::new();

        for frame in audio.samples.chunks(self.frame_samples.max(1)) {
            if let Some(text) = session.feed(frame).map_err(decode_err)? {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    segments.push(text);
                }
            }
        }

        let tail = session.flush().map_err(decode_err)?;
        let tail = tail.trim();
        if !tail.is_empty() {
            segments.push(tail.to_string());
        }

        Ok(segments.join(" "))
    }
}
