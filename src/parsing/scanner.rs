//! Whitespace-delimited token scanner for transcript text.
//!
//! Only `' '` and `'\n'` separate tokens; every other character, tabs
//! included, is part of a token. Each token remembers the character that
//! ended it, because the parser uses newline terminators to find the end of
//! an identity line.

use tracing::{info, trace};

use crate::config::ExtractorConfig;

/// Reserved token text returned once the buffer is exhausted.
pub const SENTINEL: &str = "__EOF__";

/// A maximal run of non-space, non-newline characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token characters.
    pub text: String,

    /// The character that stopped the scan: `' '` or `'\n'`.
    /// The end of the buffer counts as `'\n'`.
    pub terminator: char,

    /// Line on which the token starts (1-based).
    pub line: usize,
}

impl Token {
    /// Creates the end-of-input token.
    pub fn sentinel(line: usize) -> Self {
        Self {
            text: SENTINEL.to_string(),
            terminator: '\n',
            line,
        }
    }

    /// Returns `true` for the end-of-input token.
    pub fn is_sentinel(&self) -> bool {
        self.text == SENTINEL
    }

    /// Returns `true` if this token is the last one on its line.
    pub fn ends_line(&self) -> bool {
        self.terminator == '\n'
    }
}

/// Forward-only scan cursor over an in-memory transcript.
///
/// The cursor never backtracks. Once the buffer is exhausted every further
/// [`next_token`](Scanner::next_token) returns the sentinel again.
#[derive(Debug)]
pub struct Scanner<'a> {
    buffer: &'a str,
    pos: usize,
    line: usize,
    verbose: bool,
    progress_every_lines: Option<usize>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `buffer`.
    pub fn new(buffer: &'a str) -> Self {
        Self::with_config(buffer, &ExtractorConfig::default())
    }

    /// Creates a scanner that emits the diagnostics requested by `config`.
    pub fn with_config(buffer: &'a str, config: &ExtractorConfig) -> Self {
        Self {
            buffer,
            pos: 0,
            line: 1,
            verbose: config.verbose,
            progress_every_lines: config.progress_every_lines,
        }
    }

    /// Returns the current line counter (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scans the next token.
    pub fn next_token(&mut self) -> Token {
        let bytes = self.buffer.as_bytes();

        while self.pos < bytes.len() && is_separator(bytes[self.pos]) {
            if bytes[self.pos] == b'\n' {
                self.next_line();
            }
            self.pos += 1;
        }

        if self.pos >= bytes.len() {
            return Token::sentinel(self.line);
        }

        let start = self.pos;
        let line = self.line;
        while self.pos < bytes.len() && !is_separator(bytes[self.pos]) {
            self.pos += 1;
        }
        // Separators are ASCII, so both ends sit on char boundaries.
        let text = self.buffer[start..self.pos].to_string();

        let terminator = match bytes.get(self.pos) {
            Some(b' ') => {
                self.pos += 1;
                ' '
            }
            Some(_) => {
                self.pos += 1;
                self.next_line();
                '\n'
            }
            None => '\n',
        };

        if self.verbose {
            trace!(line, text = %text, terminator = ?terminator, "scanned token");
        }

        Token {
            text,
            terminator,
            line,
        }
    }

    fn next_line(&mut self) {
        self.line += 1;
        match self.progress_every_lines {
            Some(every) if every > 0 && self.line % every == 0 => {
                info!(line = self.line, "scanning transcript");
            }
            _ => {}
        }
    }
}

/// Yields tokens up to, but not including, the sentinel.
impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_sentinel()).then_some(token)
    }
}

fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\n'
}
