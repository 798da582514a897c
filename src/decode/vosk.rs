//! Vosk recognizer backend.
//!
//! Maps the Kaldi-style incremental recognizer onto the session contract:
//! `accept_waveform` either keeps accumulating or finalizes a segment, and
//! `final_result` drains the pending tail. One model is loaded per run and
//! shared across workers; recognizers are per-session.

use crate::decode::{DecodeSession, DecoderFactory};
use crate::error::{Result, TapescriptError};
use std::path::Path;
use std::sync::Arc;
use vosk::{DecodingState, LogLevel, Model, Recognizer};

pub struct VoskDecoderFactory {
    model: Arc<Model>,
    name: String,
}

impl VoskDecoderFactory {
    /// Load a Vosk model from a directory on disk.
    ///
    /// Library verbosity follows the process log level instead of being
    /// silenced wholesale: debug builds of the log filter get the model's
    /// own diagnostics, everything else only errors.
    pub fn new(model_dir: &Path) -> Result<Self> {
        if log::log_enabled!(log::Level::Debug) {
            vosk::set_log_level(LogLevel::Info);
        } else {
            vosk::set_log_level(LogLevel::Error);
        }

        let model_path = model_dir.display().to_string();
        let model = Model::new(model_path.clone()).ok_or_else(|| {
            TapescriptError::Other(format!("failed to load Vosk model from {model_path}"))
        })?;

        let name = model_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("vosk")
            .to_string();

        Ok(Self {
            model: Arc::new(model),
            name,
        })
    }
}

impl DecoderFactory for VoskDecoderFactory {
    fn new_session(&self, sample_rate: u32) -> Result<Box<dyn DecodeSession>> {
        let recognizer = Recognizer::new(&self.model, sample_rate as f32).ok_or_else(|| {
            TapescriptError::Other(format!(
                "failed to create recognizer at {sample_rate} Hz"
            ))
        })?;

        Ok(Box::new(VoskSession { recognizer }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct VoskSession {
    recognizer: Recognizer,
}

impl DecodeSession for VoskSession {
    fn feed(&mut self, frame: &[i16]) -> Result<Option<String>> {
        match self.recognizer.accept_waveform(frame) {
            Ok(DecodingState::Finalized) => {
                let text = self
                    .recognizer
                    .result()
                    .single()
                    .map(|r| r.text.to_string())
                    .unwrap_or_default();
                Ok(Some(text))
            }
            Ok(_) => Ok(None),
            Err(e) => Err(TapescriptError::Other(format!(
                "recognizer rejected waveform: {e:?}"
            ))),
        }
    }

    fn flush(&mut self) -> Result<String> {
        Ok(self
            .recognizer
            .final_result()
            .single()
            .map(|r| r.text.to_string())
            .unwrap_or_default())
    }
}
