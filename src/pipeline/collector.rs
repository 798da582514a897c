//! Reassembles per-chunk decode results into one ordered transcript.
//!
//! Results arrive in arbitrary order because workers run concurrently; the
//! collector writes each into a fixed slot array indexed by position. Each
//! position is owned by exactly one worker by construction of the
//! round-robin partition, so a second write to the same slot is a
//! dispatcher bug, not a recoverable condition.

use crate::error::{Result, TapescriptError};
use crate::pipeline::types::DecodeResult;

pub struct TranscriptCollector {
    slots: Vec<Option<String>>,
}

impl TranscriptCollector {
    /// Allocate one empty slot per dispatched chunk.
    pub fn new(chunk_count: usize) -> Self {
        Self {
            slots: vec![None; chunk_count],
        }
    }

    /// Record one decode result.
    ///
    /// Out-of-range positions and duplicate writes are internal
    /// consistency failures.
    pub fn insert(&mut self, result: DecodeResult) -> Result<()> {
        let slot_count = self.slots.len();
        let slot = self.slots.get_mut(result.position).ok_or_else(|| {
            TapescriptError::InternalConsistency {
                message: format!(
                    "result position {} outside dispatched range 0..{}",
                    result.position, slot_count
                ),
            }
        })?;

        if slot.is_some() {
            return Err(TapescriptError::InternalConsistency {
                message: format!("duplicate result for position {}", result.position),
            });
        }

        *slot = Some(result.text);
        Ok(())
    }

    /// Number of positions that have produced a result.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Positions that never produced a result, ascending.
    pub fn missing_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_none().then_some(i))
            .collect()
    }

    /// Join filled slots in ascending position order with single spaces.
    ///
    /// Empty and missing slots are skipped, not padded. A partial run
    /// yields a shorter transcript and the missing positions are reported
    /// separately.
    pub fn join(&self) -> String {
        self.slots
            .iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(position: usize, text: &str) -> DecodeResult {
        DecodeResult {
            position,
            text: text.to_string(),
        }
    }

    #[test]
    fn joins_in_position_order_regardless_of_arrival_order() {
        let mut collector = TranscriptCollector::new(3);

        collector.insert(result(2, "third")).unwrap();
        collector.insert(result(0, "first")).unwrap();
        collector.insert(result(1, "second")).unwrap();

        assert_eq!(collector.join(), "first second third");
    }

    #[test]
    fn arrival_order_never_changes_the_join() {
        let texts = ["a", "b", "c", "d"];
        let orders: [[usize; 4]; 3] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]];

        for order in orders {
            let mut collector = TranscriptCollector::new(4);
            for &p in &order {
                collector.insert(result(p, texts[p])).unwrap();
            }
            assert_eq!(collector.join(), "a b c d");
        }
    }

    #[test]
    fn missing_slots_are_skipped_not_padded() {
        let mut collector = TranscriptCollector::new(4);
        collector.insert(result(0, "start")).unwrap();
        collector.insert(result(3, "end")).unwrap();

        assert_eq!(collector.join(), "start end");
        assert_eq!(collector.missing_positions(), vec![1, 2]);
    }

    #[test]
    fn empty_text_counts_as_produced_but_not_joined() {
        let mut collector = TranscriptCollector::new(2);
        collector.insert(result(0, "")).unwrap();
        collector.insert(result(1, "tail")).unwrap();

        assert_eq!(collector.join(), "tail");
        assert!(collector.missing_positions().is_empty());
        assert_eq!(collector.filled(), 2);
    }

    #[test]
    fn duplicate_write_is_internal_consistency_error() {
        let mut collector = TranscriptCollector::new(2);
        collector.insert(result(1, "once")).unwrap();

        let err = collector.insert(result(1, "twice")).unwrap_err();
        assert!(matches!(
            err,
            TapescriptError::InternalConsistency { .. }
        ));
    }

    #[test]
    fn out_of_range_position_is_internal_consistency_error() {
        let mut collector = TranscriptCollector::new(2);
        let err = collector.insert(result(2, "beyond")).unwrap_err();
        assert!(matches!(
            err,
            TapescriptError::InternalConsistency { .. }
        ));
    }

    #[test]
    fn zero_chunks_joins_to_empty() {
        let collector = TranscriptCollector::new(0);
        assert_eq!(collector.join(), "");
        assert!(collector.missing_positions().is_empty());
    }
}
