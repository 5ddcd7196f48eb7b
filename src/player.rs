//! Player records as they appear in a single match.
//!
//! A match exposes individual players, not persistent team identities. The
//! only stable handle across matches is the platform `user_id`, and even that
//! may be missing when the recording could not resolve the account.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform user identifier.
///
/// This is the only key that links a player across matches of a series.
///
/// # Examples
///
/// ```
/// use series_sides::UserId;
///
/// let id = UserId::new("123456");
/// assert_eq!(id.as_str(), "123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty identifier.
    ///
    /// Empty identifiers are treated like missing ones wherever ids are
    /// resolved against the roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One player row of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Resolved platform account, or `None` when the identity is unknown.
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Account display name; overrides `name` when present and non-empty.
    #[serde(default)]
    pub user_name: Option<String>,

    /// In-game name recorded for this match.
    pub name: String,
}

impl Player {
    /// Creates a player with a known user id.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            user_name: None,
            name: name.into(),
        }
    }

    /// Creates a player whose account could not be resolved.
    #[must_use]
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            user_name: None,
            name: name.into(),
        }
    }

    /// Sets the account display name.
    #[must_use]
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Name to show for this player: `user_name` unless it is missing or empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.user_name.as_deref() {
            Some(user_name) if !user_name.is_empty() => user_name,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_user_name() {
        let player = Player::new("1", "ingame").with_user_name("Account");
        assert_eq!(player.display_name(), "Account");
    }

    #[test]
    fn display_name_falls_back_on_missing_or_empty() {
        assert_eq!(Player::new("1", "ingame").display_name(), "ingame");
        let empty = Player::new("1", "ingame").with_user_name("");
        assert_eq!(empty.display_name(), "ingame");
    }

    #[test]
    fn missing_user_id_deserializes_as_none() {
        let player: Player = serde_json::from_str(r#"{"name":"guest"}"#).unwrap();
        assert_eq!(player.user_id, None);
        assert_eq!(player.user_name, None);

        let player: Player = serde_json::from_str(r#"{"user_id":null,"name":"guest"}"#).unwrap();
        assert_eq!(player, Player::anonymous("guest"));
    }

    #[test]
    fn user_id_is_transparent() {
        let json = serde_json::to_string(&UserId::new("76561198")).unwrap();
        assert_eq!(json, "\"76561198\"");
    }
}
