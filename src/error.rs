//! Error types for the `subreflow` crate.
//!
//! This module defines [`ReflowError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to explain
//! what went wrong: the offending file, the block that failed to parse, or
//! the payload the translation provider answered with.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `subreflow` operations.
///
/// Every public method that can fail returns `Result<T, ReflowError>`.
/// None of these are retried: a failure aborts the run before any output
/// is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReflowError {
    /// The subtitle file could not be opened or read.
    #[error("Failed to open subtitle file at {}: {reason}", path.display())]
    FileOpen {
        /// Path that was passed to [`crate::SubtitleFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The input does not start with a block label digit.
    #[error("Not a recognized subtitle file: {0}")]
    NotSubtitleFile(String),

    /// A block in the input is missing its label, timestamp, or text.
    #[error("Malformed subtitle block {block}: {reason}")]
    MalformedBlock {
        /// One-based position of the block in the input.
        block: usize,
        /// What was missing.
        reason: String,
    },

    /// The translation provider answered with a non-success status.
    #[error("Translation provider returned status {status}: {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// The provider's error payload, verbatim.
        message: String,
    },

    /// The request to the translation provider never completed.
    #[error("Translation request failed: {0}")]
    Transport(String),

    /// The provider response body could not be decoded.
    #[error("Failed to decode translation response: {0}")]
    ResponseDecode(String),

    /// The provider returned a different number of translations than
    /// sentences were sent.
    #[error("Translation count mismatch: sent {expected} sentences, received {actual}")]
    CardinalityMismatch {
        /// Number of sentences in the request.
        expected: usize,
        /// Number of translations in the response.
        actual: usize,
    },

    /// An option value is out of range or a required setting is missing.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The output file exists and overwriting was not requested.
    #[error("Output already exists: {}", path.display())]
    OutputExists {
        /// The path that would have been overwritten.
        path: PathBuf,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl From<reqwest::Error> for ReflowError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ReflowError::ResponseDecode(error.to_string())
        } else {
            ReflowError::Transport(error.to_string())
        }
    }
}
