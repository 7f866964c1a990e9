//! Recursive-descent parser for chat transcripts.
//!
//! A transcript has no formal grammar, only this convention:
//!
//! ```text
//! file         := filehead chatbox* EOF
//! filehead     := token*            skipped until a date-shaped token
//! chatbox      := datetime identity message-body
//! datetime     := date-token time-token
//! identity     := token+            up to the first token ending a line
//! message-body := token*            up to the next date-shaped token or EOF
//! ```
//!
//! Any token starting with `YYYY-MM-DD` opens a new block, even inside what a
//! reader would consider message text. Body tokens are concatenated without
//! separators, so `hello world` becomes `helloworld`.
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ExtractorConfig;
//! use chatlog::parser::parse_str;
//!
//! let transcript = "\
//! 2023-01-01 08:00:00
//! alice(111)
//! hello world
//! 2023-01-02 09:00:00
//! bob<bob@x>
//! [image]
//! ";
//!
//! let messages = parse_str(transcript, &ExtractorConfig::default())?;
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[0].text, "helloworld");
//! assert_eq!(messages[1].user.uid, "bob@x");
//! # Ok::<(), chatlog::ChatlogError>(())
//! ```

use std::mem;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::debug;

use crate::Message;
use crate::config::ExtractorConfig;
use crate::error::{ChatlogError, Result};
use crate::message::{TIMESTAMP_FORMAT, UserInfo};
use crate::parsing::{IdentityResolver, Scanner, Token, default_resolver, normalize};

static DATE_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid regex"));

/// Returns `true` if `text` starts with `YYYY-MM-DD`.
///
/// This is a prefix test: `2023-01-01abc` is date-shaped too.
pub fn is_date_shaped(text: &str) -> bool {
    DATE_SHAPED.is_match(text)
}

/// Parser state: the scan cursor plus one token of lookahead.
///
/// A parser is consumed by [`parse`](Parser::parse), so every extraction
/// starts from a fresh cursor.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    lookahead: Token,
    resolver: &'a IdentityResolver,
    verbose: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser over normalized transcript text.
    pub fn new(buffer: &'a str, config: &ExtractorConfig) -> Self {
        Self::with_resolver(buffer, config, default_resolver())
    }

    /// Creates a parser that splits identity lines with `resolver`.
    pub fn with_resolver(
        buffer: &'a str,
        config: &ExtractorConfig,
        resolver: &'a IdentityResolver,
    ) -> Self {
        let mut scanner = Scanner::with_config(buffer, config);
        let lookahead = scanner.next_token();
        Self {
            scanner,
            lookahead,
            resolver,
            verbose: config.verbose,
        }
    }

    /// Returns the current lookahead token.
    pub fn lookahead(&self) -> &Token {
        &self.lookahead
    }

    /// Returns the scanner's line counter.
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    /// Parses the whole transcript.
    ///
    /// The first grammar violation aborts parsing; no partial result is
    /// returned.
    pub fn parse(mut self) -> Result<Vec<Message>> {
        self.parse_filehead()?;

        let mut messages = Vec::new();
        while !self.lookahead.is_sentinel() {
            messages.push(self.parse_chatbox()?);
        }
        Ok(messages)
    }

    /// Consumes the lookahead if its text equals `expected`.
    pub fn match_token(&mut self, expected: &str) -> Result<Token> {
        if self.lookahead.text != expected {
            return Err(self.mismatch(expected));
        }
        Ok(self.advance())
    }

    /// Consumes whatever the lookahead is, unless input has run out.
    ///
    /// `what` names the grammar element being read and ends up as the
    /// expected text of the error.
    fn consume(&mut self, what: &str) -> Result<Token> {
        if self.lookahead.is_sentinel() {
            return Err(self.mismatch(what));
        }
        Ok(self.advance())
    }

    fn advance(&mut self) -> Token {
        let next = self.scanner.next_token();
        mem::replace(&mut self.lookahead, next)
    }

    fn mismatch(&self, expected: &str) -> ChatlogError {
        ChatlogError::parse(self.lookahead.line, expected, self.lookahead.text.as_str())
    }

    /// Skips the preamble up to the first date-shaped token.
    fn parse_filehead(&mut self) -> Result<()> {
        while !is_date_shaped(&self.lookahead.text) {
            self.consume("a YYYY-MM-DD timestamp")?;
        }
        Ok(())
    }

    fn parse_chatbox(&mut self) -> Result<Message> {
        let timestamp = self.parse_datetime()?;
        let user = self.parse_identity()?;
        let text = self.parse_message_body()?;
        Ok(Message::new(timestamp, user, text))
    }

    fn parse_datetime(&mut self) -> Result<NaiveDateTime> {
        let date = self.consume("a YYYY-MM-DD date")?;
        let raw = format!("{} {}", date.text, self.lookahead.text);

        let timestamp = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map_err(|e| ChatlogError::datetime_format(date.line, raw.as_str(), e))?;
        self.consume("a HH:MM:SS time")?;

        if self.verbose {
            debug!(line = date.line, %timestamp, "extracted datetime");
        }
        Ok(timestamp)
    }

    fn parse_identity(&mut self) -> Result<UserInfo> {
        let mut raw = String::new();
        loop {
            let token = self.consume("an identity line")?;
            raw.push_str(&token.text);
            if token.ends_line() {
                break;
            }
        }

        let user = self.resolver.resolve(&raw);
        if self.verbose {
            debug!(username = %user.username, uid = %user.uid, "extracted user info");
        }
        Ok(user)
    }

    fn parse_message_body(&mut self) -> Result<String> {
        let mut text = String::new();
        while !is_date_shaped(&self.lookahead.text) && !self.lookahead.is_sentinel() {
            let token = self.consume("message text")?;
            text.push_str(&token.text);
        }
        Ok(text)
    }
}

/// Parses transcript content held in memory.
///
/// The content is [normalized](crate::parsing::normalize) first, so BOMs and
/// CRLF line endings are accepted.
pub fn parse_str(content: &str, config: &ExtractorConfig) -> Result<Vec<Message>> {
    let buffer = normalize(content);
    Parser::new(&buffer, config).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::SENTINEL;
    use chrono::NaiveDate;

    fn parse(content: &str) -> Result<Vec<Message>> {
        parse_str(content, &ExtractorConfig::default())
    }

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_date_shaped() {
        assert!(is_date_shaped("2023-01-01"));
        assert!(is_date_shaped("2023-01-01abc"));
        assert!(!is_date_shaped("23-01-01"));
        assert!(!is_date_shaped("x2023-01-01"));
        assert!(!is_date_shaped("2023/01/01"));
        assert!(!is_date_shaped(SENTINEL));
    }

    #[test]
    fn test_two_blocks() {
        let messages = parse(
            "2023-01-01 08:00:00\nalice(111)\nhello world\n\
             2023-01-02 09:00:00\nbob<bob@x>\n[image]\n",
        )
        .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].timestamp, ts(2023, 1, 1, 8, 0, 0));
        assert_eq!(messages[0].user, UserInfo::new("alice", "111"));
        assert_eq!(messages[0].text, "helloworld");
        assert_eq!(messages[1].timestamp, ts(2023, 1, 2, 9, 0, 0));
        assert_eq!(messages[1].user, UserInfo::new("bob", "bob@x"));
        assert_eq!(messages[1].text, "[image]");
    }

    #[test]
    fn test_filehead_is_skipped() {
        let messages = parse(
            "Message history\n====\nGroup: friends\n\n2023-01-01 08:00:00\ncarol\nhi\n",
        )
        .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user, UserInfo::new("carol", ""));
        assert_eq!(messages[0].text, "hi");
    }

    #[test]
    fn test_multiline_body_is_concatenated() {
        let messages = parse("2023-01-01 08:00:00\nalice(1)\nfirst line\nsecond line\n").unwrap();
        assert_eq!(messages[0].text, "firstlinesecondline");
    }

    #[test]
    fn test_empty_body() {
        let messages =
            parse("2023-01-01 08:00:00\nalice(1)\n2023-01-01 08:00:05\nbob(2)\nhey\n").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "");
        assert_eq!(messages[1].text, "hey");
    }

    #[test]
    fn test_identity_spans_tokens_on_one_line() {
        let messages = parse("2023-01-01 08:00:00\nJohn Smith(123)\nhello\n").unwrap();
        assert_eq!(messages[0].user, UserInfo::new("JohnSmith", "123"));
    }

    #[test]
    fn test_identity_with_trailing_space_swallows_next_line() {
        // The identity ends at the first token whose terminator is a newline.
        let messages = parse("2023-01-01 08:00:00\nalice \nhello world\n").unwrap();
        assert_eq!(messages[0].user.username, "alicehelloworld");
        assert_eq!(messages[0].text, "");
    }

    #[test]
    fn test_date_in_body_starts_new_block() {
        let err = parse("2023-01-01 08:00:00\nalice(1)\nsee you on\n2023-02-01 then\n")
            .unwrap_err();
        assert!(err.is_datetime_format());
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_date_in_body_with_time_shape_splits_message() {
        let messages =
            parse("2023-01-01 08:00:00\nalice(1)\nmeet at 2023-02-01 10:00:00 ok\nbye\n").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "meetat");
        assert_eq!(messages[1].timestamp, ts(2023, 2, 1, 10, 0, 0));
        assert_eq!(messages[1].user.username, "ok");
        assert_eq!(messages[1].text, "bye");
    }

    #[test]
    fn test_malformed_datetime() {
        let err = parse("header\n\n2023-13-40 99:99:99\nalice(1)\nhi\n").unwrap_err();
        match err {
            ChatlogError::DatetimeFormat { line, raw, .. } => {
                assert_eq!(line, 3);
                assert_eq!(raw, "2023-13-40 99:99:99");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_timestamp_anywhere() {
        let err = parse("just some text\nwithout blocks\n").unwrap_err();
        match err {
            ChatlogError::Parse {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, "a YYYY-MM-DD timestamp");
                assert_eq!(found, SENTINEL);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = parse("").unwrap_err();
        assert!(err.is_parse());
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_block_truncated_before_identity() {
        let err = parse("2023-01-01 08:00:00\nalice(1)\nhi\n2023-01-02 09:00:00\n").unwrap_err();
        match err {
            ChatlogError::Parse {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 5);
                assert_eq!(expected, "an identity line");
                assert_eq!(found, SENTINEL);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_time_is_datetime_error() {
        let err = parse("2023-01-01\nalice(1)\nhi\n").unwrap_err();
        assert!(err.is_datetime_format());
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_crlf_and_bom() {
        let messages =
            parse("\u{feff}2023-01-01 08:00:00\r\nalice(111)\r\nhello\r\n").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user, UserInfo::new("alice", "111"));
        assert_eq!(messages[0].text, "hello");
    }

    #[test]
    fn test_no_trailing_newline() {
        let messages = parse("2023-01-01 08:00:00\nalice(111)\nhello").unwrap();
        assert_eq!(messages[0].text, "hello");

        let messages = parse("2023-01-01 08:00:00\nalice(111)").unwrap();
        assert_eq!(messages[0].user.uid, "111");
        assert_eq!(messages[0].text, "");
    }

    #[test]
    fn test_match_token() {
        let buffer = "2023-01-01 08:00:00\n";
        let mut parser = Parser::new(buffer, &ExtractorConfig::default());

        let err = parser.match_token("2024-01-01").unwrap_err();
        match err {
            ChatlogError::Parse {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 1);
                assert_eq!(expected, "2024-01-01");
                assert_eq!(found, "2023-01-01");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let token = parser.match_token("2023-01-01").unwrap();
        assert_eq!(token.terminator, ' ');
        assert_eq!(parser.lookahead().text, "08:00:00");
        parser.match_token("08:00:00").unwrap();
        assert!(parser.lookahead().is_sentinel());
        assert_eq!(parser.line(), 2);
    }

    #[test]
    fn test_verbose_config_does_not_change_output() {
        let content = "2023-01-01 08:00:00\nalice(111)\nhello world\n";
        let quiet = parse(content).unwrap();
        let verbose = parse_str(
            content,
            &ExtractorConfig::new()
                .with_verbose(true)
                .with_progress_every_lines(1),
        )
        .unwrap();
        assert_eq!(quiet, verbose);
    }

    #[test]
    fn test_deserialized_zero_progress_interval() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{"verbose":false,"progress_every_lines":0}"#).unwrap();
        let messages = parse_str("2023-01-01 08:00:00\nalice(111)\nhi\n", &config).unwrap();
        assert_eq!(messages.len(), 1);
    }
}
