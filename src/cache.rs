//! In-memory entity cache.
//!
//! The supervisor keeps the users and guilds it has seen so far, so
//! `Client::get_user`/`get_guild` can answer without a REST round trip.
//! Nothing here survives a process restart.

use crate::events::Event;
use dashmap::DashMap;
use driftwire_model::{Guild, Id, User};

/// Users and guilds observed on the event stream, keyed by id.
#[derive(Default)]
pub struct EntityCache {
    users: DashMap<Id, User>,
    guilds: DashMap<Id, Guild>,
}

impl EntityCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record anything cacheable the event carries. Called by the
    /// dispatcher after conversion, before fan-out.
    pub fn observe(&self, event: &Event) {
        match event {
            Event::MessageCreate(msg) => {
                self.users.insert(msg.author.id, msg.author.clone());
            }
            Event::GuildCreate(guild) => {
                self.guilds.insert(guild.id, guild.clone());
            }
            _ => {}
        }
    }

    /// Look up a user by id.
    pub fn user(&self, id: Id) -> Option<User> {
        self.users.get(&id).map(|entry| entry.clone())
    }

    /// Look up a guild by id.
    pub fn guild(&self, id: Id) -> Option<Guild> {
        self.guilds.get(&id).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwire_model::Message;

    #[test]
    fn observes_message_authors_and_guilds() {
        let cache = EntityCache::new();
        let author = User {
            id: Id::new(7),
            username: "armitage".into(),
            display_name: None,
            bot: false,
        };
        cache.observe(&Event::MessageCreate(Message {
            id: Id::new(1),
            channel_id: Id::new(2),
            guild_id: None,
            author: author.clone(),
            content: "hi".into(),
            timestamp: None,
        }));
        cache.observe(&Event::GuildCreate(Guild {
            id: Id::new(9),
            name: "sprawl".into(),
            member_count: Some(3),
        }));

        assert_eq!(cache.user(Id::new(7)), Some(author));
        assert_eq!(cache.guild(Id::new(9)).unwrap().name, "sprawl");
        assert!(cache.user(Id::new(404)).is_none());
    }
}
