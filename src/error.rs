//! Error types for tapescript.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapescriptError {
    // Media acquisition errors: fatal to the whole run, no chunking attempted
    #[error("Failed to acquire source media: {message}")]
    Acquisition { message: String },

    // Audio format errors
    #[error("Unsupported audio format: {message}")]
    UnsupportedFormat { message: String },

    #[error("Chunk format violation in {path}: {message}")]
    Format { path: String, message: String },

    // Decoding errors: fatal to the owning worker only
    #[error("Decode failed on chunk {position}: {message}")]
    Decode { position: usize, message: String },

    // Summarization errors: degrade the run, never abort it
    #[error("Summarization failed: {message}")]
    Summarize { message: String },

    // Dispatcher/partition bugs: always fatal
    #[error("Internal consistency violation: {message}")]
    InternalConsistency { message: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TapescriptError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_acquisition_display() {
        let error = TapescriptError::Acquisition {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to acquire source media: connection refused"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = TapescriptError::UnsupportedFormat {
            message: "zero channels".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported audio format: zero channels");
    }

    #[test]
    fn test_format_display() {
        let error = TapescriptError::Format {
            path: "chunks/chunk_3.wav".to_string(),
            message: "expected mono, got 2 channels".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Chunk format violation in chunks/chunk_3.wav: expected mono, got 2 channels"
        );
    }

    #[test]
    fn test_decode_display() {
        let error = TapescriptError::Decode {
            position: 4,
            message: "recognizer rejected waveform".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Decode failed on chunk 4: recognizer rejected waveform"
        );
    }

    #[test]
    fn test_internal_consistency_display() {
        let error = TapescriptError::InternalConsistency {
            message: "duplicate result for position 2".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Internal consistency violation: duplicate result for position 2"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = TapescriptError::ConfigInvalidValue {
            key: "worker_count".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for worker_count: must be at least 1"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: TapescriptError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: TapescriptError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: TapescriptError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TapescriptError>();
        assert_sync::<TapescriptError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(TapescriptError::Other("test error".to_string()))
        }
        assert!(returns_error().is_err());
    }
}
