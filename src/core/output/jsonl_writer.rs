//! JSON Lines (JSONL) output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Message;
use crate::error::Result;

use super::OutputRecord;

/// Writes messages to a JSONL file, one compact JSON object per line.
///
/// ```jsonl
/// {"datetime":"2023-01-01 08:00:00","uid":"111","username":"alice","message":"hi"}
/// ```
pub fn write_jsonl(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for msg in messages {
        serde_json::to_writer(&mut writer, &OutputRecord::from(msg))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[Message]) -> Result<String> {
    let mut out = String::new();
    for msg in messages {
        out.push_str(&serde_json::to_string(&OutputRecord::from(msg))?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserInfo;
    use chrono::NaiveDate;
    use std::io::{BufRead, BufReader};
    use tempfile::NamedTempFile;

    fn sample() -> Vec<Message> {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        vec![
            Message::new(ts, UserInfo::new("alice", "111"), "hello"),
            Message::new(ts, UserInfo::new("carol", ""), "line\"quoted\""),
        ]
    }

    #[test]
    fn test_write_jsonl_lines() {
        let temp_file = NamedTempFile::new().unwrap();
        write_jsonl(&sample(), temp_file.path()).unwrap();

        let file = std::fs::File::open(temp_file.path()).unwrap();
        let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["username"], "alice");
        assert_eq!(first["datetime"], "2023-01-01 08:00:00");

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["uid"], "");
        assert_eq!(second["message"], "line\"quoted\"");
    }

    #[test]
    fn test_to_jsonl_matches_file_output() {
        let temp_file = NamedTempFile::new().unwrap();
        write_jsonl(&sample(), temp_file.path()).unwrap();

        let from_file = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(to_jsonl(&sample()).unwrap(), from_file);
    }

    #[test]
    fn test_jsonl_has_no_array_brackets() {
        let content = to_jsonl(&sample()).unwrap();
        assert!(!content.starts_with('['));
        assert_eq!(content.matches('\n').count(), 2);
    }
}
