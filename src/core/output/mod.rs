//! Output format writers.
//!
//! - [`write_csv`] / [`to_csv`] - `datetime,uid,username,message` rows, requires `csv-output`
//! - [`write_json`] / [`to_json`] - JSON array of records, requires `json-output`
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON record per line, requires `json-output`
//!
//! All three formats share the same four fields, with the timestamp rendered
//! as `YYYY-MM-DD HH:MM:SS`.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatlog::Result<()> {
//! use chatlog::config::OutputConfig;
//! use chatlog::core::output::{to_jsonl, write_csv};
//! use chatlog::{Message, UserInfo};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let messages = vec![Message::new(ts, UserInfo::new("alice", "111"), "helloworld")];
//!
//! write_csv(&messages, "output.csv", &OutputConfig::new())?;
//! let jsonl = to_jsonl(&messages)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{CSV_HEADER, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

#[cfg(any(feature = "csv-output", feature = "json-output"))]
use serde::Serialize;

#[cfg(any(feature = "csv-output", feature = "json-output"))]
use crate::Message;

/// Flat view of a message, shared by every writer.
#[cfg(any(feature = "csv-output", feature = "json-output"))]
#[derive(Debug, Serialize)]
struct OutputRecord<'a> {
    datetime: String,
    uid: &'a str,
    username: &'a str,
    message: &'a str,
}

#[cfg(any(feature = "csv-output", feature = "json-output"))]
impl<'a> From<&'a Message> for OutputRecord<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            datetime: msg.formatted_timestamp(),
            uid: msg.uid(),
            username: msg.username(),
            message: msg.text(),
        }
    }
}
