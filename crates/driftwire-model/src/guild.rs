//! Guild (server-side community) types.

use crate::id::Id;
use serde::{Deserialize, Serialize};

/// A guild the account is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Unique identifier.
    pub id: Id,
    /// Human-readable name.
    pub name: String,
    /// Member count, when the gateway includes it.
    #[serde(default)]
    pub member_count: Option<u64>,
}
