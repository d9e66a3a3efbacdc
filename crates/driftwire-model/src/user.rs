//! User and account types.

use crate::id::Id;
use serde::{Deserialize, Serialize};

/// A user as seen in inbound events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Id,
    /// Login name.
    pub username: String,
    /// Display name, when the user set one.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Whether the author is an automated account. Bot-authored messages
    /// never trigger command execution.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Name to show in logs and replies: display name when present,
    /// login name otherwise.
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// The authenticated account returned by the REST login call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: Id,
    /// Login name.
    pub username: String,
    /// Whether this account is registered as a bot.
    #[serde(default)]
    pub bot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_flag_defaults_to_false() {
        let user: User =
            serde_json::from_str(r#"{"id": "7", "username": "case"}"#).unwrap();
        assert!(!user.bot);
        assert_eq!(user.visible_name(), "case");
    }

    #[test]
    fn display_name_wins_when_present() {
        let user: User = serde_json::from_str(
            r#"{"id": "7", "username": "case", "display_name": "Case", "bot": true}"#,
        )
        .unwrap();
        assert!(user.bot);
        assert_eq!(user.visible_name(), "Case");
    }
}
