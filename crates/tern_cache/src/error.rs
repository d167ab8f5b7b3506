//! Error types for parse cache operations.

use std::path::PathBuf;

/// Errors that can occur while resolving a batch of files.
///
/// Syntax errors are never cache errors: they travel as diagnostics inside
/// the parsed file. A failed call inserts nothing into the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A file handle's content could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The location of the unreadable file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The caller cancelled the request.
    #[error("parse request cancelled")]
    Cancelled,
}

impl CacheError {
    /// Returns `true` if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CacheError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_display() {
        let err = CacheError::Read {
            path: PathBuf::from("/src/main.tn"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to read"));
        assert!(msg.contains("main.tn"));
        assert!(msg.contains("file not found"));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn cancelled_display() {
        let err = CacheError::Cancelled;
        assert_eq!(err.to_string(), "parse request cancelled");
        assert!(err.is_cancelled());
    }
}
