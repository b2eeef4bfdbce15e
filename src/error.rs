//! Error types for llp-dp.
//!
//! The solvers themselves are infallible once their inputs are built; errors
//! arise only while loading records, parsing a mode selector, or building a
//! dedicated thread pool.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for llp-dp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file is missing or unreadable.
    ///
    /// Callers that prefer to continue on an empty record set use the
    /// `*_or_empty` loaders in [`crate::records`].
    #[error("input unavailable: {path}: {source}")]
    InputUnavailable {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A text line did not parse into the expected integer tuple.
    #[error("malformed record at line {line} ({content:?}): {reason}")]
    MalformedRecord {
        /// 1-based line number in the input text.
        line: usize,
        /// The offending line, trimmed.
        content: String,
        /// What was expected.
        reason: String,
    },

    /// The algorithm selector is not one of the recognised modes.
    #[error("invalid mode {0:?}")]
    InvalidMode(String),

    /// A dedicated rayon pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Convenience type alias for Results using the llp-dp Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            line,
            content: content.trim().to_string(),
            reason: reason.into(),
        }
    }
}
