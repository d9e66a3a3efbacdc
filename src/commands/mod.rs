//! Text-command routing layered on the `message_create` event.
//!
//! A [`Command`](core::Command) is registered by name (or pattern) in the
//! [`CommandRegistry`](registry::CommandRegistry); the
//! [`CommandParser`](parser::CommandParser) turns message text into a
//! resolved command plus arguments; the built-in
//! [`CommandRouter`](router::CommandRouter) wires all of it to dispatch.

pub mod context;
pub mod core;
pub mod help;
pub mod parser;
pub mod registry;
pub mod router;

pub use context::Context;
pub use core::{Args, Command, CommandBuilder, CommandResult, Signature};
pub use parser::{CommandParser, ParsedMessage};
pub use registry::CommandRegistry;
pub use router::CommandRouter;
