//! Message records extracted from a transcript.
//!
//! A transcript block becomes one [`Message`]: the block's timestamp, the
//! author resolved into a [`UserInfo`], and the message body.
//!
//! # Examples
//!
//! ```
//! use chatlog::{Message, UserInfo};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(8, 0, 0)
//!     .unwrap();
//! let msg = Message::new(ts, UserInfo::new("alice", "111"), "helloworld");
//!
//! assert_eq!(msg.username(), "alice");
//! assert_eq!(msg.uid(), "111");
//! assert_eq!(msg.text(), "helloworld");
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout of a transcript block, also used for CSV output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Author of a message.
///
/// `uid` is empty when the identity line carried neither a `name(digits)`
/// nor a `name<text>` marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UserInfo {
    /// Display name, the identity text before the uid marker.
    pub username: String,

    /// User identifier taken from the marker, possibly empty.
    pub uid: String,
}

impl UserInfo {
    /// Creates a new user record.
    pub fn new(username: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            uid: uid.into(),
        }
    }

    /// Returns `true` if the identity line carried a uid marker with content.
    pub fn has_uid(&self) -> bool {
        !self.uid.is_empty()
    }
}

/// One chat message parsed from a transcript block.
///
/// `text` holds the body tokens concatenated without separators, so the
/// spacing between words is not preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent, as written in the transcript.
    pub timestamp: NaiveDateTime,

    /// Who sent the message.
    pub user: UserInfo,

    /// Message body.
    pub text: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(timestamp: NaiveDateTime, user: UserInfo, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            user,
            text: text.into(),
        }
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the author.
    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    /// Returns the author's display name.
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Returns the author's uid, empty if none was found.
    pub fn uid(&self) -> &str {
        &self.user.uid
    }

    /// Returns the message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the timestamp formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Returns `true` if the message body is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
