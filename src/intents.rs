//! Gateway capability flags.
//!
//! A session declares which event categories it subscribes to as a bitset
//! sent during identify. The supervisor validates the configured bits with
//! [`Intents::from_bits`] before any network I/O; unrecognized bits fail
//! fast instead of silently subscribing to nothing.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitset of event categories a session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Intents(u64);

impl Intents {
    /// Guild lifecycle events (create, update, delete).
    pub const GUILDS: Intents = Intents(1 << 0);
    /// Member join/leave/update events.
    pub const GUILD_MEMBERS: Intents = Intents(1 << 1);
    /// Moderation events (bans, audit entries).
    pub const GUILD_MODERATION: Intents = Intents(1 << 2);
    /// Emoji and sticker updates.
    pub const GUILD_EMOJIS: Intents = Intents(1 << 3);
    /// Integration updates.
    pub const GUILD_INTEGRATIONS: Intents = Intents(1 << 4);
    /// Webhook updates.
    pub const GUILD_WEBHOOKS: Intents = Intents(1 << 5);
    /// Invite create/delete.
    pub const GUILD_INVITES: Intents = Intents(1 << 6);
    /// Voice state updates.
    pub const GUILD_VOICE_STATES: Intents = Intents(1 << 7);
    /// Presence updates.
    pub const GUILD_PRESENCES: Intents = Intents(1 << 8);
    /// Messages posted in guild channels.
    pub const GUILD_MESSAGES: Intents = Intents(1 << 9);
    /// Reactions in guild channels.
    pub const GUILD_MESSAGE_REACTIONS: Intents = Intents(1 << 10);
    /// Typing notifications in guild channels.
    pub const GUILD_MESSAGE_TYPING: Intents = Intents(1 << 11);
    /// Direct messages.
    pub const DIRECT_MESSAGES: Intents = Intents(1 << 12);
    /// Reactions in direct messages.
    pub const DIRECT_MESSAGE_REACTIONS: Intents = Intents(1 << 13);
    /// Typing notifications in direct messages.
    pub const DIRECT_MESSAGE_TYPING: Intents = Intents(1 << 14);
    /// Full message text in message events.
    pub const MESSAGE_CONTENT: Intents = Intents(1 << 15);

    /// Every bit the platform currently recognizes.
    const KNOWN_BITS: u64 = (1 << 16) - 1;

    /// No subscriptions.
    pub const fn empty() -> Intents {
        Intents(0)
    }

    /// Every recognized category.
    pub const fn all() -> Intents {
        Intents(Self::KNOWN_BITS)
    }

    /// Raw bit value sent on the wire.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Validate a raw bit value. Returns `None` when any unrecognized bit
    /// is set; this is the capability check `connect()` performs.
    pub const fn from_bits(bits: u64) -> Option<Intents> {
        if bits & !Self::KNOWN_BITS != 0 {
            None
        } else {
            Some(Intents(bits))
        }
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Intents) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Intents {
    /// The subscriptions a text-command client needs: guilds, guild and
    /// direct messages, and message content.
    fn default() -> Intents {
        Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::DIRECT_MESSAGES
            | Intents::MESSAGE_CONTENT
    }
}

impl BitOr for Intents {
    type Output = Intents;
    fn bitor(self, rhs: Intents) -> Intents {
        Intents(self.0 | rhs.0)
    }
}

impl BitOrAssign for Intents {
    fn bitor_assign(&mut self, rhs: Intents) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Intents {
    type Output = Intents;
    fn bitand(self, rhs: Intents) -> Intents {
        Intents(self.0 & rhs.0)
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
