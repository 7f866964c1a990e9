//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Message;
use crate::error::Result;

use super::OutputRecord;

/// Writes messages to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {"datetime": "2023-01-01 08:00:00", "uid": "111", "username": "alice", "message": "hi"}
/// ]
/// ```
pub fn write_json(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(messages)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts messages to a JSON array string.
pub fn to_json(messages: &[Message]) -> Result<String> {
    let records: Vec<OutputRecord<'_>> = messages.iter().map(OutputRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
