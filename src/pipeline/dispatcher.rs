//! Worker pool dispatcher: static round-robin partition, bounded fan-out,
//! join barrier, and outcome aggregation.
//!
//! The partition is computed once before any thread starts and never
//! changes during a run. The only resource shared for writes is the result
//! sink; chunk artifacts are read-only and each worker touches only its
//! own assignments.

use crate::decode::DecoderFactory;
use crate::error::{Result, TapescriptError};
use crate::pipeline::collector::TranscriptCollector;
use crate::pipeline::types::{AudioChunk, FailureMode, RunOutcome};
use crate::pipeline::worker::DecodeWorker;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of concurrent decode workers.
    pub worker_count: usize,
    /// Samples per frame fed to a decode session.
    pub frame_samples: usize,
    /// Sample rate chunks are expected to carry.
    pub sample_rate: u32,
    /// What happens to surviving workers when one fails.
    pub failure_mode: FailureMode,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_count: crate::defaults::WORKER_COUNT,
            frame_samples: crate::defaults::FRAME_SAMPLES,
            sample_rate: crate::defaults::SAMPLE_RATE,
            failure_mode: FailureMode::default(),
        }
    }
}

pub struct Dispatcher {
    config: DispatcherConfig,
    factory: Arc<dyn DecoderFactory>,
}

/// Round-robin partition: worker `w` owns `{ p : p mod n == w }`,
/// ascending within each group.
fn partition(chunks: Vec<AudioChunk>, worker_count: usize) -> Vec<Vec<AudioChunk>> {
    let mut groups: Vec<Vec<AudioChunk>> = (0..worker_count).map(|_| Vec::new()).collect();
    for chunk in chunks {
        groups[chunk.position % worker_count].push(chunk);
    }
    for group in &mut groups {
        group.sort_by_key(|c| c.position);
    }
    groups
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig, factory: Arc<dyn DecoderFactory>) -> Self {
        Self { config, factory }
    }

    /// Decode all chunks across the worker pool and reassemble the
    /// transcript.
    ///
    /// Blocks until every worker has terminated; no result is read before
    /// that barrier. With zero workers or zero chunks, no thread is
    /// started and an empty transcript is returned immediately.
    pub fn run(&self, chunks: Vec<AudioChunk>) -> Result<RunOutcome> {
        let chunk_count = chunks.len();
        let n = self.config.worker_count;

        if n == 0 || chunk_count == 0 {
            return Ok(RunOutcome {
                transcript: String::new(),
                missing: chunks.iter().map(|c| c.position).collect(),
                failures: Vec::new(),
                chunk_count,
            });
        }

        let groups = partition(chunks, n);
        let (sink, results) = crossbeam_channel::unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let fail_fast = matches!(self.config.failure_mode, FailureMode::FailFast);

        log::info!(
            "dispatching {} chunk(s) across {} worker(s) via {}",
            chunk_count,
            n,
            self.factory.name()
        );

        let mut handles = Vec::with_capacity(n);
        for (id, group) in groups.into_iter().enumerate() {
            let worker = DecodeWorker {
                id,
                chunks: group,
                factory: Arc::clone(&self.factory),
                sink: sink.clone(),
                cancel: Arc::clone(&cancel),
                fail_fast,
                frame_samples: self.config.frame_samples,
                target_rate: self.config.sample_rate,
            };
            handles.push(thread::spawn(move || worker.run()));
        }
        // Workers hold the only remaining senders; the channel closes when
        // the last one terminates.
        drop(sink);

        // Join barrier: every worker terminates before any result is read.
        let mut failures = Vec::new();
        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => {
                    log::warn!(
                        "worker {} failed at chunk {}: {}",
                        failure.worker,
                        failure.position,
                        failure.message
                    );
                    failures.push(failure);
                }
                Err(_) => {
                    return Err(TapescriptError::InternalConsistency {
                        message: format!("worker {id} panicked"),
                    });
                }
            }
        }

        let mut collector = TranscriptCollector::new(chunk_count);
        while let Ok(result) = results.try_recv() {
            collector.insert(result)?;
        }

        // Every missing position must be explained by a reported failure:
        // a worker that claims success but skipped a chunk (or the
        // reverse) is a partition bug.
        let missing = collector.missing_positions();
        let expected: BTreeSet<usize> = failures
            .iter()
            .flat_map(|f| {
                (f.position..chunk_count).filter(move |p| p % n == f.worker)
            })
            .collect();
        if missing.iter().copied().collect::<BTreeSet<_>>() != expected {
            return Err(TapescriptError::InternalConsistency {
                message: format!(
                    "dispatched {} chunk(s) but {} result(s) arrived with {} failure(s); \
                     missing positions {:?} do not match abandoned positions {:?}",
                    chunk_count,
                    collector.filled(),
                    failures.len(),
                    missing,
                    expected
                ),
            });
        }

        failures.sort_by_key(|f| f.worker);
        Ok(RunOutcome {
            transcript: collector.join(),
            missing,
            failures,
            chunk_count,
        })
    }
}
