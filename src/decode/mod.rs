//! Incremental speech decoding abstraction.
//!
//! The acoustic model is an external collaborator with a streaming
//! contract: a session accepts fixed-size PCM frames, may finalize a text
//! segment after any frame, and yields its pending tail on flush. The
//! factory is injected into the pipeline explicitly, one session per
//! chunk, created by the worker that owns it, never reached through
//! global state.

#[cfg(feature = "vosk-backend")]
pub mod vosk;

use crate::error::{Result, TapescriptError};

/// One incremental decoding session, bound to a single audio stream.
///
/// Session state is inherently sequential; sessions are never shared
/// across threads, only the factory is.
pub trait DecodeSession: Send {
    /// Feed one frame of mono PCM samples.
    ///
    /// Returns `Some(text)` when the session finalized a segment on this
    /// frame, `None` while it is still accumulating context.
    fn feed(&mut self, frame: &[i16]) -> Result<Option<String>>;

    /// Finish the stream and return the pending segment (may be empty).
    fn flush(&mut self) -> Result<String>;
}

/// Factory for decode sessions, shared across workers.
pub trait DecoderFactory: Send + Sync {
    /// Open a new session for a stream at the given sample rate.
    fn new_session(&self, sample_rate: u32) -> Result<Box<dyn DecodeSession>>;

    /// Backend name for logging and status output.
    fn name(&self) -> &str;
}

/// Mock decoding backend for tests.
///
/// Each session tags its output with the first sample of the first frame
/// it sees. Tests write chunk audio whose leading sample encodes the chunk
/// position, then assert on reassembly from the tagged texts.
#[derive(Debug, Clone, Default)]
pub struct MockDecoderFactory {
    finalize_every: Option<usize>,
    fail_on_tag: Option<i16>,
    flush_delay_ms_even_tags: u64,
}

impl MockDecoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize a segment after every `frames` frames fed.
    pub fn with_finalize_every(mut self, frames: usize) -> Self {
        self.finalize_every = Some(frames);
        self
    }

    /// Fail the session whose stream starts with this sample value.
    pub fn with_failure_on_tag(mut self, tag: i16) -> Self {
        self.fail_on_tag = Some(tag);
        self
    }

    /// Delay flush for even-tagged sessions, shuffling completion order.
    pub fn with_flush_delay_on_even_tags(mut self, delay_ms: u64) -> Self {
        self.flush_delay_ms_even_tags = delay_ms;
        self
    }
}

impl DecoderFactory for MockDecoderFactory {
    fn new_session(&self, _sample_rate: u32) -> Result<Box<dyn DecodeSession>> {
        Ok(Box::new(MockSession {
            finalize_every: self.finalize_every,
            fail_on_tag: self.fail_on_tag,
            flush_delay_ms_even_tags: self.flush_delay_ms_even_tags,
            tag: None,
            frames_fed: 0,
            segments_emitted: 0,
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockSession {
    finalize_every: Option<usize>,
    fail_on_tag: Option<i16>,
    flush_delay_ms_even_tags: u64,
    tag: Option<i16>,
    frames_fed: usize,
    segments_emitted: usize,
}

impl MockSession {
    fn tag(&self) -> i16 {
        self.tag.unwrap_or(0)
    }
}

impl DecodeSession for MockSession {
    fn feed(&mut self, frame: &[i16]) -> Result<Option<String>> {
        if self.tag.is_none() {
            self.tag = frame.first().copied();
        }
        if let Some(fail_tag) = self.fail_on_tag
            && self.tag() == fail_tag
        {
            return Err(TapescriptError::Other(format!(
                "mock decode failure for tag {fail_tag}"
            )));
        }

        self.frames_fed += 1;
        if let Some(every) = self.finalize_every
            && every > 0
            && self.frames_fed % every == 0
        {
            self.segments_emitted += 1;
            return Ok(Some(format!("seg{}-c{}", self.segments_emitted, self.tag())));
        }
        Ok(None)
    }

    fn flush(&mut self) -> Result<String> {
        if let Some(fail_tag) = self.fail_on_tag
            && self.tag() == fail_tag
        {
            return Err(TapescriptError::Other(format!(
                "mock decode failure for tag {fail_tag}"
            )));
        }
        if self.flush_delay_ms_even_tags > 0 && self.tag() % 2 == 0 {
            std::thread::sleep(std::time::Duration::from_millis(
                self.flush_delay_ms_even_tags,
            ));
        }
        Ok(format!("tail-c{}", self.tag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_session_flushes_tagged_tail() {
        let factory = MockDecoderFactory::new();
        let mut session = factory.new_session(16000).unwrap();

        assert_eq!(session.feed(&[7, 0, 0]).unwrap(), None);
        assert_eq!(session.flush().unwrap(), "tail-c7");
    }

    #[test]
    fn mock_session_finalizes_on_schedule() {
        let factory = MockDecoderFactory::new().with_finalize_every(2);
        let mut session = factory.new_session(16000).unwrap();

        assert_eq!(session.feed(&[3]).unwrap(), None);
        assert_eq!(session.feed(&[3]).unwrap(), Some("seg1-c3".to_string()));
        assert_eq!(session.feed(&[3]).unwrap(), None);
        assert_eq!(session.feed(&[3]).unwrap(), Some("seg2-c3".to_string()));
        assert_eq!(session.flush().unwrap(), "tail-c3");
    }

    #[test]
    fn mock_session_fails_on_configured_tag() {
        let factory = MockDecoderFactory::new().with_failure_on_tag(5);
        let mut session = factory.new_session(16000).unwrap();

        assert!(session.feed(&[5, 0]).is_err());

        let mut healthy = factory.new_session(16000).unwrap();
        assert!(healthy.feed(&[4, 0]).is_ok());
    }

    #[test]
    fn mock_session_empty_frame_uses_zero_tag() {
        let factory = MockDecoderFactory::new();
        let mut session = factory.new_session(16000).unwrap();

        assert_eq!(session.feed(&[]).unwrap(), None);
        assert_eq!(session.flush().unwrap(), "tail-c0");
    }

    #[test]
    fn factory_trait_is_object_safe() {
        let factory: Box<dyn DecoderFactory> = Box::new(MockDecoderFactory::new());
        assert_eq!(factory.name(), "mock");
        let mut session = factory.new_session(16000).unwrap();
        assert!(session.flush().is_ok());
    }
}
