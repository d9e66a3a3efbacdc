//! The default help command.

use super::core::Command;
use crate::error::CommandError;

/// Build the built-in `help` command: replies with one line per
/// registered command, name plus description. Installed at construction
/// unless `[command] help = false`; removable with
/// `Client::remove_command("help")`.
pub fn help_command() -> Result<Command, CommandError> {
    Command::builder("help")
        .description("list available commands")
        .build(|ctx, _args| async move {
            let mut lines = Vec::new();
            for command in ctx.client.commands() {
                match command.description() {
                    Some(text) => lines.push(format!("{} - {}", command.name(), text)),
                    None => lines.push(command.name().to_string()),
                }
            }
            ctx.reply(&lines.join("\n")).await
        })
}
