//! CSV output writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::Message;
use crate::config::OutputConfig;
use crate::error::{ChatlogError, Result};

use super::OutputRecord;

/// Column names of the CSV output.
pub const CSV_HEADER: [&str; 4] = ["datetime", "uid", "username", "message"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes messages to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `datetime`, `uid`, `username`, `message`
/// - Encoding: UTF-8, prefixed with a byte-order mark when [`OutputConfig::bom`] is set
///
/// Fields holding commas, quotes or newlines are quoted.
pub fn write_csv(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(BufWriter::new(file), messages, config)?;
    Ok(())
}

/// Converts messages to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing to file.
pub fn to_csv(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let bytes = write_records(Vec::new(), messages, config)?;
    String::from_utf8(bytes).map_err(|e| ChatlogError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_records<W: Write>(mut sink: W, messages: &[Message], config: &OutputConfig) -> Result<W> {
    if config.bom {
        sink.write_all(UTF8_BOM)?;
    }

    // The header is written explicitly so an empty slice still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(CSV_HEADER)?;

    for msg in messages {
        writer.serialize(OutputRecord::from(msg))?;
    }

    writer.flush()?;
    let mut sink = writer
        .into_inner()
        .map_err(|e| ChatlogError::Io(e.into_error()))?;
    sink.flush()?;
    Ok(sink)
}
