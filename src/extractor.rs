//! Extraction session over one transcript file.
//!
//! An [`Extractor`] owns the loaded file content and the list of messages
//! extracted from it. Its lifecycle:
//!
//! ```text
//! Unloaded --change_path--> Loaded --extract--> Extracted | Failed
//!                             ^                      |
//!                             +-----change_path------+
//! ```
//!
//! `Extracted` and `Failed` may call [`extract`](Extractor::extract) again;
//! every call parses the buffer from the start.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chatlog::Result<()> {
//! use chatlog::Extractor;
//!
//! let mut extractor = Extractor::open("chat.txt")?;
//! extractor.extract()?;
//! extractor.drop_bad_data();
//! extractor.to_csv("chat.csv")?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::Message;
use crate::config::{ExtractorConfig, OutputConfig};
use crate::core::filter;
use crate::error::{ChatlogError, Result};
use crate::format::{OutputFormat, write_to_format};
use crate::parser::Parser;
use crate::parsing::normalize;

/// Where an [`Extractor`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No transcript loaded yet.
    #[default]
    Unloaded,
    /// A transcript is loaded but not yet extracted.
    Loaded,
    /// The last extraction succeeded.
    Extracted,
    /// The last extraction hit a grammar violation.
    Failed,
}

/// A transcript together with the messages extracted from it.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    path: Option<PathBuf>,
    buffer: Option<String>,
    messages: Vec<Message>,
    state: SessionState,
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates an empty session. Load a file with [`change_path`](Self::change_path).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with `path` already loaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.change_path(path)?;
        Ok(extractor)
    }

    /// Creates a session over in-memory transcript content.
    pub fn from_string(content: &str) -> Self {
        Self {
            buffer: Some(normalize(content)),
            state: SessionState::Loaded,
            ..Self::default()
        }
    }

    /// Sets the extraction configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the extraction configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Returns the path of the loaded file, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the extracted messages in source order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consumes the session and returns the extracted messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Loads a new transcript and discards previous results.
    ///
    /// On a read error the session is left untouched.
    pub fn change_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        self.buffer = Some(normalize(&content));
        self.path = Some(path.to_path_buf());
        self.messages.clear();
        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Parses the loaded transcript into the message store.
    ///
    /// Extraction is all-or-nothing: on error the store is left empty and
    /// the session moves to [`SessionState::Failed`].
    ///
    /// # Errors
    ///
    /// - [`ChatlogError::NothingToExtract`] if no transcript was loaded
    /// - [`ChatlogError::Parse`] or [`ChatlogError::DatetimeFormat`] on malformed input
    pub fn extract(&mut self) -> Result<&[Message]> {
        let buffer = self.buffer.as_deref().ok_or(ChatlogError::NothingToExtract)?;
        let source = self
            .path
            .as_deref()
            .map_or_else(|| "<memory>".into(), Path::to_string_lossy);

        info!(source = %source, "Extracting data");
        self.messages.clear();

        match Parser::new(buffer, &self.config).parse() {
            Ok(messages) => {
                info!(count = messages.len(), "Extraction successfully completed");
                self.messages = messages;
                self.state = SessionState::Extracted;
                Ok(&self.messages)
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// Loads `path` and extracts it in one step.
    pub fn extract_from(&mut self, path: impl AsRef<Path>) -> Result<&[Message]> {
        self.change_path(path)?;
        self.extract()
    }

    /// Removes messages holding attachment placeholders or mentions.
    ///
    /// An empty store is left as is, with a warning.
    pub fn drop_bad_data(&mut self) -> &[Message] {
        filter::drop_bad_data_with_stats(&mut self.messages);
        &self.messages
    }

    /// Like [`drop_bad_data`](Self::drop_bad_data), returning before/after counts.
    pub fn drop_bad_data_with_stats(&mut self) -> filter::FilterStats {
        filter::drop_bad_data_with_stats(&mut self.messages)
    }

    /// Writes the store to `path` as CSV with a byte-order mark.
    ///
    /// An empty store writes nothing and logs a warning.
    #[cfg(feature = "csv-output")]
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write(path, OutputFormat::Csv, &OutputConfig::default())
    }

    /// Writes the store to `path` in `format`.
    ///
    /// An empty store writes nothing and logs a warning.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        format: OutputFormat,
        config: &OutputConfig,
    ) -> Result<()> {
        let path = path.as_ref();
        if self.messages.is_empty() {
            warn!(path = %path.display(), "Cannot write output: message list is empty");
            return Ok(());
        }

        write_to_format(&self.messages, path, format, config)?;
        info!(
            path = %path.display(),
            %format,
            count = self.messages.len(),
            "Data saved"
        );
        Ok(())
    }

    /// Takes the messages out of the store, leaving it empty.
    pub fn take_messages(&mut self) -> Vec<Message> {
        mem::take(&mut self.messages)
    }
}
