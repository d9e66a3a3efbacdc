//! # driftwire-model
//!
//! Domain types for the driftwire client runtime: entity identifiers,
//! users, messages, guilds, and the raw event envelope received from the
//! gateway. These types carry no runtime behaviour; the `driftwire` crate
//! owns connection lifecycle and dispatch.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod envelope;
pub mod guild;
pub mod id;
pub mod message;
pub mod user;

pub use envelope::Envelope;
pub use guild::Guild;
pub use id::Id;
pub use message::Message;
pub use user::{Account, User};
