//! Post-processing of extracted messages.
//!
//! This module contains:
//! - [`filter`] - removal of attachment placeholders and mentions
//! - [`output`] - format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use chatlog::core::{
//!     Message, FilterStats,
//!     drop_bad_data, drop_bad_data_with_stats,
//!     write_csv, write_json, write_jsonl,
//! };
//! # }
//! ```

pub mod filter;
pub mod output;

pub use filter::{FilterStats, drop_bad_data, drop_bad_data_with_stats, is_bad_data};

pub use crate::Message;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
