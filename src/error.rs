//! Unified error types for chatlog.
//!
//! This module provides a single [`ChatlogError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Grammar violations are fatal**: a [`ChatlogError::Parse`] or
//!   [`ChatlogError::DatetimeFormat`] aborts the whole extraction, no partial
//!   result is kept
//! - **Errors point at the source**: parse errors carry the offending line,
//!   the expected token and the token actually found
//! - **Empty stores are not errors**: filtering or serializing nothing only
//!   logs a warning

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatlog operations.
///
/// # Example
///
/// ```rust
/// use chatlog::error::Result;
/// use chatlog::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlogError>;

/// The error type for all chatlog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlogError {
    /// An I/O error occurred while reading a transcript or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The token stream does not have the shape of a transcript.
    ///
    /// Raised by a failed match in the parser, e.g. a block that ends before
    /// its identity line or a file without any timestamp.
    #[error("Parse error at line {line}: expected {expected}, found '{found}'")]
    Parse {
        /// Source line of the offending token (1-based)
        line: usize,
        /// What the parser was looking for
        expected: String,
        /// The token actually found
        found: String,
    },

    /// A block's timestamp does not parse as `YYYY-MM-DD HH:MM:SS`.
    #[error("Invalid timestamp '{raw}' at line {line}: {source}")]
    DatetimeFormat {
        /// Source line of the date token (1-based)
        line: usize,
        /// The date and time tokens joined by a space
        raw: String,
        /// The underlying chrono error
        #[source]
        source: chrono::ParseError,
    },

    /// `extract` was called before any transcript was loaded.
    #[error("Nothing to extract: no transcript has been loaded")]
    NothingToExtract,

    /// Output format name or extension was not recognized.
    #[error("Unknown output format '{input}'. Expected one of: csv, json, jsonl")]
    UnknownFormat {
        /// The rejected name or extension
        input: String,
    },

    /// A configuration value cannot be used.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlogError {
    /// Creates a parse error.
    pub fn parse(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ChatlogError::Parse {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a timestamp format error.
    pub fn datetime_format(line: usize, raw: impl Into<String>, source: chrono::ParseError) -> Self {
        ChatlogError::DatetimeFormat {
            line,
            raw: raw.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatlogError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlogError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatlogError::Parse { .. })
    }

    /// Returns `true` if this is a timestamp format error.
    pub fn is_datetime_format(&self) -> bool {
        matches!(self, ChatlogError::DatetimeFormat { .. })
    }

    /// Returns the source line for grammar errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            ChatlogError::Parse { line, .. } | ChatlogError::DatetimeFormat { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
