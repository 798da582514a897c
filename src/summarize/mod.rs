//! Text summarization and key-point extraction.
//!
//! The model is an external collaborator with the contract "given a
//! string, return a shorter string". Input is pre-chunked by a fixed
//! character budget with no semantic boundary guarantee; per-piece
//! summaries join with a single space. Key points are the same capability
//! with a wider length preset, split into an ordered list.

pub mod remote;

use crate::defaults;
use crate::error::{Result, TapescriptError};
use async_trait::async_trait;

pub use remote::RemoteSummarizer;

/// Length bounds passed through to the summarization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    pub max_length: usize,
    pub min_length: usize,
}

impl SummaryParams {
    /// Preset for the transcript summary.
    pub const SUMMARY: Self = Self {
        max_length: defaults::SUMMARY_MAX_LENGTH,
        min_length: defaults::SUMMARY_MIN_LENGTH,
    };

    /// Preset for key-point extraction.
    pub const KEY_POINTS: Self = Self {
        max_length: defaults::KEY_POINT_MAX_LENGTH,
        min_length: defaults::KEY_POINT_MIN_LENGTH,
    };
}

/// External summarization capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize one piece of text (already within the character budget).
    async fn summarize_piece(&self, text: &str, params: SummaryParams) -> Result<String>;
}

/// Split text into pieces of at most `budget` characters.
///
/// Cuts are purely positional (no word or sentence alignment) but always
/// land on character boundaries, so multi-byte text never splits inside a
/// code point.
pub fn split_by_char_budget(text: &str, budget: usize) -> Vec<&str> {
    if text.is_empty() || budget == 0 {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == budget {
            pieces.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&text[start..]);
    pieces
}

/// Summarize arbitrarily long text piecewise and join the results.
pub async fn summarize_text(
    summarizer: &dyn Summarizer,
    text: &str,
    params: SummaryParams,
    char_budget: usize,
) -> Result<String> {
    let pieces = split_by_char_budget(text, char_budget);
    let mut summaries = Vec::with_capacity(pieces.len());

    for piece in pieces {
        summaries.push(summarizer.summarize_piece(piece, params).await?);
    }

    Ok(summaries.join(" "))
}

/// Extract an ordered list of key points from text.
///
/// Runs the summarizer with the key-point preset, then splits the combined
/// output on sentence ends.
pub async fn extract_key_points(
    summarizer: &dyn Summarizer,
    text: &str,
    char_budget: usize,
) -> Result<Vec<String>> {
    let combined = summarize_text(summarizer, text, SummaryParams::KEY_POINTS, char_budget).await?;

    Ok(combined
        .split(". ")
        .map(|p| p.trim().trim_end_matches('.').to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

/// Mock summarizer for tests.
#[derive(Debug, Clone, Default)]
pub struct MockSummarizer {
    response: Option<String>,
    should_fail: bool,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fixed response for every piece instead of the default
    /// piece echo.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize_piece(&self, text: &str, params: SummaryParams) -> Result<String> {
        if self.should_fail {
            return Err(TapescriptError::Summarize {
                message: "mock summarization failure".to_string(),
            });
        }
        match &self.response {
            Some(response) => Ok(response.clone()),
            // Default: echo a truncation so tests can see which piece
            // each summary came from.
            None => Ok(text.chars().take(params.max_length).collect()),
        }
    }
}
