//! # driftwire
//!
//! Client runtime for the Driftwire messaging platform: a connection
//! supervisor with automatic reconnection, an event dispatcher with
//! per-handler failure isolation, and a prefix-based command framework.
//!
//! ## Quick Start
//!
//! ```no_run
//! use driftwire::{Client, ClientConfig, Command, Event, handler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::default());
//!
//!     client.on(None, false, handler("greeter", |event| async move {
//!         if let Event::MessageCreate(msg) = event {
//!             println!("<{}> {}", msg.author.visible_name(), msg.content);
//!         }
//!         Ok(())
//!     }))?;
//!
//!     let ping = Command::builder("ping")
//!         .description("Liveness check.")
//!         .build(|ctx, _args| async move { ctx.reply("pong").await })?;
//!     client.add_command(ping)?;
//!
//!     client.run("token").await?;
//!     Ok(())
//! }
//! ```
//!
//! Handlers run concurrently; a failing handler never takes down its
//! peers or the connection. Failures surface as the reserved
//! `event_error` event, which logs by default and can be overridden like
//! any other listener.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod events;
pub mod gateway;
pub mod intents;
pub mod rest;

pub use cache::EntityCache;
pub use client::{Client, ClientHandle};
pub use commands::{Args, Command, CommandBuilder, Context};
pub use config::{ClientConfig, CommandConfig, ConnectionConfig};
pub use convert::{DataConverter, JsonConverter};
pub use error::{
    ClientError, CommandError, ConvertError, EventFailure, GatewayError, HandlerError,
    HandlerResult, RegistryError, RestError,
};
pub use events::{Event, EventHandler, HandlerKind, handler};
pub use intents::Intents;

pub use driftwire_model as model;
pub use driftwire_model::{Account, Envelope, Guild, Id, Message, User};
