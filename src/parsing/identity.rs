//! Identity line resolution.
//!
//! Transcript exports encode the author in one of two ways:
//!
//! | Form | Example | username | uid |
//! |------|---------|----------|-----|
//! | Parenthetical | `alice(111)` | `alice` | `111` |
//! | Angle bracket | `bob<bob@x.com>` | `bob` | `bob@x.com` |
//! | Neither | `carol` | `carol` | *(empty)* |
//!
//! Both forms are tested independently, in that order, and the **last** one
//! that matches wins. An identity such as `alice(1)<a@x>` therefore resolves
//! through the angle-bracket form.

use std::sync::LazyLock;

use regex::Regex;

use crate::message::UserInfo;

static PARENTHESIZED_UID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([0-9]*\)").expect("valid regex"));

// Greedy: spans from the first '<' to the last '>'.
static ANGLE_BRACKET_UID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*>").expect("valid regex"));

static DEFAULT_RESOLVER: LazyLock<IdentityResolver> = LazyLock::new(IdentityResolver::new);

/// One way of splitting an identity string into a [`UserInfo`].
pub trait IdentityStrategy: Send + Sync {
    /// Returns the name of the strategy.
    fn name(&self) -> &'static str;

    /// Returns the split identity, or `None` if the marker is absent.
    ///
    /// The returned username may be empty when the marker opens the string.
    fn resolve(&self, raw: &str) -> Option<UserInfo>;
}

/// `name(digits)`: the uid is the digit run inside the first parenthesized group.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParenthesizedUid;

impl IdentityStrategy for ParenthesizedUid {
    fn name(&self) -> &'static str {
        "parenthesized"
    }

    fn resolve(&self, raw: &str) -> Option<UserInfo> {
        let found = PARENTHESIZED_UID.find(raw)?;
        let uid = found.as_str().trim_start_matches('(').trim_end_matches(')');
        Some(UserInfo::new(&raw[..found.start()], uid))
    }
}

/// `name<text>`: the uid is everything between the first `<` and the last `>`,
/// with any nested angle brackets removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleBracketUid;

impl IdentityStrategy for AngleBracketUid {
    fn name(&self) -> &'static str {
        "angle-bracket"
    }

    fn resolve(&self, raw: &str) -> Option<UserInfo> {
        let found = ANGLE_BRACKET_UID.find(raw)?;
        let uid = found.as_str().replace(['<', '>'], "");
        Some(UserInfo::new(&raw[..found.start()], uid))
    }
}

/// Ordered list of identity strategies where the last match wins.
///
/// When no strategy matches, or the winning one leaves the username empty,
/// the whole raw string becomes the username.
pub struct IdentityResolver {
    strategies: Vec<Box<dyn IdentityStrategy>>,
}

impl IdentityResolver {
    /// Creates the standard resolver: parenthetical, then angle bracket.
    pub fn new() -> Self {
        Self::with_strategies(vec![Box::new(ParenthesizedUid), Box::new(AngleBracketUid)])
    }

    /// Creates a resolver from strategies in ascending precedence.
    pub fn with_strategies(strategies: Vec<Box<dyn IdentityStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the strategy names in ascending precedence.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Splits a raw identity string into username and uid.
    pub fn resolve(&self, raw: &str) -> UserInfo {
        let winner = self
            .strategies
            .iter()
            .filter_map(|strategy| strategy.resolve(raw))
            .last();

        match winner {
            Some(user) if !user.username.is_empty() => user,
            Some(user) => UserInfo::new(raw, user.uid),
            None => UserInfo::new(raw, ""),
        }
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// Returns the shared standard resolver.
pub fn default_resolver() -> &'static IdentityResolver {
    &DEFAULT_RESOLVER
}

/// Splits a raw identity string with the standard resolver.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::resolve_identity;
///
/// let user = resolve_identity("alice(111)");
/// assert_eq!(user.username, "alice");
/// assert_eq!(user.uid, "111");
/// ```
pub fn resolve_identity(raw: &str) -> UserInfo {
    DEFAULT_RESOLVER.resolve(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized() {
        assert_eq!(resolve_identity("alice(111)"), UserInfo::new("alice", "111"));
    }

    #[test]
    fn test_angle_bracket() {
        assert_eq!(
            resolve_identity("bob<bob@x.com>"),
            UserInfo::new("bob", "bob@x.com")
        );
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(resolve_identity("carol"), UserInfo::new("carol", ""));
    }

    #[test]
    fn test_angle_bracket_overrides_parenthesized() {
        assert_eq!(
            resolve_identity("dave(42)<dave@x.com>"),
            UserInfo::new("dave(42)", "dave@x.com")
        );
        // order in the string does not matter, precedence does
        assert_eq!(
            resolve_identity("erin<e@x>(7)"),
            UserInfo::new("erin", "e@x")
        );
    }

    #[test]
    fn test_parenthesized_requires_digits_only() {
        assert_eq!(resolve_identity("frank(abc)"), UserInfo::new("frank(abc)", ""));
        // an empty group still counts as a marker
        assert_eq!(resolve_identity("gina()"), UserInfo::new("gina", ""));
    }

    #[test]
    fn test_first_parenthesized_group_wins() {
        assert_eq!(
            resolve_identity("hal(1)(2)"),
            UserInfo::new("hal", "1")
        );
    }

    #[test]
    fn test_angle_bracket_is_greedy() {
        assert_eq!(
            resolve_identity("ivy<a<b>c>"),
            UserInfo::new("ivy", "abc")
        );
    }

    #[test]
    fn test_empty_username_falls_back_to_raw() {
        assert_eq!(resolve_identity("(123)"), UserInfo::new("(123)", "123"));
        assert_eq!(resolve_identity("<x@y>"), UserInfo::new("<x@y>", "x@y"));
    }

    #[test]
    fn test_multibyte_names() {
        assert_eq!(
            resolve_identity("小明(10001)"),
            UserInfo::new("小明", "10001")
        );
    }

    #[test]
    fn test_custom_strategy_order() {
        let resolver = IdentityResolver::with_strategies(vec![
            Box::new(AngleBracketUid),
            Box::new(ParenthesizedUid),
        ]);
        assert_eq!(resolver.strategy_names(), ["angle-bracket", "parenthesized"]);
        assert_eq!(
            resolver.resolve("dave(42)<dave@x.com>"),
            UserInfo::new("dave", "42")
        );
    }
}
