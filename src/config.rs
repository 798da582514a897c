//! Configuration for tapescript.
//!
//! Loaded from TOML (default `~/.config/tapescript/config.toml`), with
//! every field overridable from the command line and a few from the
//! environment. Missing fields fall back to defaults.

use crate::defaults;
use crate::error::{Result, TapescriptError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineSettings,
    pub decode: DecodeSettings,
    pub summary: SummarySettings,
}

/// Chunking and worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub chunk_length_ms: u64,
    pub worker_count: usize,
    pub frame_samples: usize,
    pub sample_rate: u32,
    /// Directory the source file and chunk artifacts live in for one run.
    pub work_dir: PathBuf,
    /// Stop all workers at the first decode failure instead of letting
    /// siblings finish their own groups.
    pub fail_fast: bool,
}

/// Decoding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DecodeSettings {
    /// Directory holding the recognizer model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

/// Summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarySettings {
    pub enabled: bool,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub char_budget: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chunk_length_ms: defaults::CHUNK_LENGTH_MS,
            worker_count: defaults::WORKER_COUNT,
            frame_samples: defaults::FRAME_SAMPLES,
            sample_rate: defaults::SAMPLE_RATE,
            work_dir: PathBuf::from("."),
            fail_fast: false,
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: defaults::SUMMARY_ENDPOINT.to_string(),
            api_token: None,
            char_budget: defaults::SUMMARY_CHAR_BUDGET,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields use default values; invalid TOML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from an explicit path, the default location, or defaults.
    ///
    /// An explicit path must exist and parse. The default location is only
    /// read when present.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Default config file location (`~/.config/tapescript/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tapescript").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TAPESCRIPT_MODEL_DIR → decode.model_dir
    /// - TAPESCRIPT_SUMMARY_ENDPOINT → summary.endpoint
    /// - TAPESCRIPT_API_TOKEN → summary.api_token
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("TAPESCRIPT_MODEL_DIR")
            && !dir.is_empty()
        {
            self.decode.model_dir = Some(PathBuf::from(dir));
        }
        if let Ok(endpoint) = std::env::var("TAPESCRIPT_SUMMARY_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.summary.endpoint = endpoint;
        }
        if let Ok(token) = std::env::var("TAPESCRIPT_API_TOKEN")
            && !token.is_empty()
        {
            self.summary.api_token = Some(token);
        }
        self
    }

    /// Validate values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.worker_count == 0 {
            return Err(TapescriptError::ConfigInvalidValue {
                key: "pipeline.worker_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.pipeline.chunk_length_ms == 0 {
            return Err(TapescriptError::ConfigInvalidValue {
                key: "pipeline.chunk_length_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.pipeline.frame_samples == 0 {
            return Err(TapescriptError::ConfigInvalidValue {
                key: "pipeline.frame_samples".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.pipeline.sample_rate == 0 {
            return Err(TapescriptError::ConfigInvalidValue {
                key: "pipeline.sample_rate".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.summary.char_budget == 0 {
            return Err(TapescriptError::ConfigInvalidValue {
                key: "summary.char_budget".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Path of the downloaded source recording for this run.
    pub fn source_path(&self) -> PathBuf {
        self.pipeline.work_dir.join(defaults::SOURCE_FILE_NAME)
    }

    /// Path of the chunk artifact directory for this run.
    pub fn chunk_dir(&self) -> PathBuf {
        self.pipeline.work_dir.join(defaults::CHUNK_DIR_NAME)
    }
}
