//! # chatlog
//!
//! Extracts structured messages from exported chat-transcript text files.
//!
//! ## Overview
//!
//! A transcript export has no formal grammar, only a loose convention: an
//! arbitrary preamble followed by repeating blocks of
//!
//! ```text
//! 2023-01-01 08:00:00
//! alice(111)
//! hello world
//! ```
//!
//! i.e. a timestamp line, an identity line and a free-text body that runs
//! until the next timestamp. chatlog turns such a file into an ordered list
//! of [`Message`] records, drops the ones that carry attachment placeholders
//! or mentions, and writes the rest as CSV, JSON or JSON Lines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlog::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut extractor = Extractor::open("chat.txt")?;
//!     extractor.extract()?;
//!     extractor.drop_bad_data();
//!     extractor.to_csv("chat.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! For content already in memory use [`parser::parse_str`]:
//!
//! ```rust
//! use chatlog::config::ExtractorConfig;
//! use chatlog::parser::parse_str;
//!
//! let messages = parse_str("2023-01-01 08:00:00\nbob<bob@x.com>\nhi\n", &ExtractorConfig::default())?;
//! assert_eq!(messages[0].username(), "bob");
//! assert_eq!(messages[0].uid(), "bob@x.com");
//! # Ok::<(), chatlog::ChatlogError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`extractor`] - [`Extractor`] session: load, extract, filter, write
//! - [`parser`] - recursive-descent transcript parser
//! - [`parsing`] - scanner, identity resolution and input normalization
//! - [`core`] - bad-data filter and output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`training`] - segmentation, vocabulary and batch sampling (feature `training`)
//! - [`config`] - extraction and output configuration
//! - [`error`] - unified error type ([`ChatlogError`], [`Result`])
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extractor;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsing;
#[cfg(feature = "training")]
pub mod training;

// Re-export the main types at the crate root for convenience
pub use error::{ChatlogError, Result};
pub use extractor::{Extractor, SessionState};
pub use message::{Message, UserInfo};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlog::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Message, UserInfo};

    pub use crate::error::{ChatlogError, Result};

    pub use crate::extractor::{Extractor, SessionState};

    pub use crate::config::{ExtractorConfig, OutputConfig};

    pub use crate::parser::{Parser, parse_str};

    pub use crate::core::filter::{FilterStats, drop_bad_data};

    pub use crate::format::{OutputFormat, write_to_format};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    #[cfg(feature = "training")]
    pub use crate::training::{BatchSampler, CharSegmenter, Segmenter, Vocabulary, WordSegmenter, tokenize};
}
