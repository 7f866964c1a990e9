//! Configuration types for extraction and output.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ExtractorConfig`] - diagnostics while scanning and parsing a transcript
//! - [`OutputConfig`] - file writer settings
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ExtractorConfig;
//! use chatlog::Extractor;
//!
//! let config = ExtractorConfig::new()
//!     .with_verbose(true)
//!     .with_progress_every_lines(10_000);
//!
//! let extractor = Extractor::new().with_config(config);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for transcript extraction.
///
/// Neither setting changes what gets extracted; both only control the
/// `tracing` events emitted along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Log every scanned token and every parsed timestamp and identity (default: false)
    pub verbose: bool,

    /// Emit a progress event each time this many source lines have been scanned (default: off).
    /// `Some(0)` is treated as off.
    pub progress_every_lines: Option<usize>,
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables verbose tracing.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reports progress every `lines` source lines. Zero disables reporting.
    #[must_use]
    pub fn with_progress_every_lines(mut self, lines: usize) -> Self {
        self.progress_every_lines = (lines > 0).then_some(lines);
        self
    }
}

/// Configuration for output writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix CSV output with a UTF-8 byte-order mark (default: true)
    pub bom: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { bom: true }
    }
}

impl OutputConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the byte-order mark on CSV output.
    #[must_use]
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}
