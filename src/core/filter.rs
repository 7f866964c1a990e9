//! Drop messages that carry no usable text.
//!
//! Chat exports render non-text content as bracketed placeholders such as
//! `[image]` or `[图片]`, and mentions as `@name`. Neither is useful as
//! training text, so [`drop_bad_data`] removes every message whose text
//! contains a `[...]` run or an `@`.
//!
//! # Examples
//!
//! ```
//! use chatlog::core::filter::drop_bad_data;
//! use chatlog::{Message, UserInfo};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new(ts, UserInfo::new("alice", "1"), "helloworld"),
//!     Message::new(ts, UserInfo::new("bob", "2"), "[image]"),
//!     Message::new(ts, UserInfo::new("carol", "3"), "@alicehi"),
//! ];
//!
//! let kept = drop_bad_data(messages);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].text, "helloworld");
//! ```
//!
//! # Behavior Notes
//!
//! - Filtering is idempotent: survivors never match the exclusion test
//! - An empty input is reported with a warning and returned unchanged

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::Message;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*\]").expect("valid regex"));

/// Returns `true` if the message text holds an attachment placeholder or a mention.
pub fn is_bad_data(message: &Message) -> bool {
    message.text.contains('@') || BRACKETED.is_match(&message.text)
}

/// Counts before and after a filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    /// Messages before filtering
    pub before: usize,
    /// Messages kept
    pub after: usize,
}

impl FilterStats {
    /// Number of messages removed.
    pub fn dropped(&self) -> usize {
        self.before - self.after
    }

    /// Percentage of messages removed.
    pub fn drop_ratio(&self) -> f64 {
        if self.before == 0 {
            return 0.0;
        }
        self.dropped() as f64 / self.before as f64 * 100.0
    }
}

/// Removes bad data in place and reports how many messages were kept.
pub fn drop_bad_data_with_stats(messages: &mut Vec<Message>) -> FilterStats {
    let before = messages.len();
    if before == 0 {
        warn!("Cannot drop bad data: message list is empty");
        return FilterStats::default();
    }

    messages.retain(|msg| !is_bad_data(msg));

    let stats = FilterStats {
        before,
        after: messages.len(),
    };
    info!(
        kept = stats.after,
        dropped = stats.dropped(),
        "Bad data successfully dropped"
    );
    stats
}

/// Filters a collection of messages, keeping those with plain text.
///
/// This function consumes the input vector.
pub fn drop_bad_data(mut messages: Vec<Message>) -> Vec<Message> {
    drop_bad_data_with_stats(&mut messages);
    messages
}
