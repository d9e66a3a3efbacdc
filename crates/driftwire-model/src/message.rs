//! Messages delivered over the gateway.

use crate::id::Id;
use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text message received on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: Id,
    /// Channel the message was posted to.
    pub channel_id: Id,
    /// Guild the channel belongs to, absent for direct messages.
    #[serde(default)]
    pub guild_id: Option<Id>,
    /// The author.
    pub author: User,
    /// Raw text content. The command parser reads this.
    pub content: String,
    /// Server-side receive time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
