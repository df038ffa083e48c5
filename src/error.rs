//! Error types for the extraction pipeline.
//!
//! Per-file failures (`SourceRead`, `Decode`) are non-fatal: the batch
//! orchestrator records them and moves on. `Write` is fatal only for the
//! artifact it names.

use std::path::PathBuf;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a document collection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source file missing or unreadable
    #[error("Failed to read source file {}: {source}", path.display())]
    SourceRead {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Markup could not be converted into text lines
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode {
        /// Offending file (empty when decoding an in-memory string)
        path: PathBuf,
        /// Reason for the decode failure
        reason: String,
    },

    /// Output artifact could not be persisted
    #[error("Failed to write output artifact {}: {source}", path.display())]
    Write {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failure
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be started
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error outside of per-file reads (directory listing)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a decode error that is not yet attached to a file.
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Error::Decode {
            path: PathBuf::new(),
            reason: reason.into(),
        }
    }

    /// Attach a path to a decode error produced by an in-memory decode.
    pub(crate) fn with_path(self, file: &std::path::Path) -> Self {
        match self {
            Error::Decode { reason, .. } => Error::Decode {
                path: file.to_path_buf(),
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_read_error() {
        let err = Error::SourceRead {
            path: PathBuf::from("/tmp/missing.rtf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("missing.rtf"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_decode_error_with_path() {
        let err = Error::decode("missing \\rtf header").with_path(std::path::Path::new("a.rtf"));
        let msg = format!("{}", err);
        assert!(msg.contains("a.rtf"));
        assert!(msg.contains("missing \\rtf header"));
    }

    #[test]
    fn test_write_error_names_path() {
        let err = Error::Write {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(format!("{}", err).contains("out.json"));
    }

    #[test]
    fn test_invalid_config_error() {
        let err = Error::InvalidConfig("batch_size must be at least 1".to_string());
        assert_eq!(format!("{}", err), "Invalid configuration: batch_size must be at least 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
