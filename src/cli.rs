//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//!
//! Both convert into the library's configuration types, so the binary stays
//! a thin wrapper around [`Extractor`](crate::Extractor).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ExtractorConfig, OutputConfig};

/// Output path used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "chat_messages.csv";

/// Extract timestamped messages from exported chat-transcript text files.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlog chat.txt
    chatlog chat.txt -o messages.csv
    chatlog chat.txt --format jsonl --keep-bad-data
    chatlog chat.txt -v --progress-every 100000")]
pub struct Args {
    /// Path to the transcript file
    pub input: PathBuf,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Keep messages with attachment placeholders ([...]) or mentions (@)
    #[arg(long)]
    pub keep_bad_data: bool,

    /// Log every token, timestamp and identity while parsing
    #[arg(short, long)]
    pub verbose: bool,

    /// Log progress every N source lines
    #[arg(long, value_name = "N")]
    pub progress_every: Option<usize>,

    /// Do not prefix CSV output with a byte-order mark
    #[arg(long)]
    pub no_bom: bool,
}

impl Args {
    /// Builds the extraction configuration from the flags.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::new()
            .with_verbose(self.verbose)
            .with_progress_every_lines(self.progress_every.unwrap_or(0))
    }

    /// Builds the writer configuration from the flags.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new().with_bom(!self.no_bom)
    }

    /// Returns the output path, with the extension matching `--format` when
    /// the default path is in use.
    pub fn output_path(&self) -> PathBuf {
        if self.output.as_os_str() != DEFAULT_OUTPUT {
            return self.output.clone();
        }
        self.output.with_extension(self.format.extension())
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// datetime,uid,username,message rows (default)
    #[default]
    Csv,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
