//! Building blocks of the transcript parser.
//!
//! - [`scanner`] - whitespace-delimited tokens with terminator and line number
//! - [`identity`] - splitting an identity line into username and uid

pub mod identity;
pub mod scanner;

pub use identity::{
    AngleBracketUid, IdentityResolver, IdentityStrategy, ParenthesizedUid, default_resolver,
    resolve_identity,
};
pub use scanner::{SENTINEL, Scanner, Token};

/// Prepares raw file content for scanning.
///
/// Strips a leading UTF-8 byte-order mark, drops every carriage return and
/// makes sure the content ends with a newline.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::normalize;
///
/// assert_eq!(normalize("\u{feff}a\r\nb"), "a\nb\n");
/// ```
pub fn normalize(raw: &str) -> String {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut normalized = content.replace('\r', "");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}
