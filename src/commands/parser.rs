//! Message parsing: prefix handling and signature-driven argument split.

use super::core::{Args, Command};
use super::registry::CommandRegistry;
use std::sync::Arc;

/// Result of parsing one message. `command: None` with empty arguments
/// means "not a command" and is never an error.
#[derive(Debug, Default)]
pub struct ParsedMessage {
    /// The resolved command, if the text addressed one.
    pub command: Option<Arc<Command>>,
    /// Parsed arguments.
    pub args: Args,
}

impl ParsedMessage {
    fn none() -> Self {
        ParsedMessage::default()
    }
}

/// Parses message text against the configured prefix and a registry.
pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    /// Create a parser with the given command prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        CommandParser {
            prefix: prefix.into(),
        }
    }

    /// Parse message text. Strips the prefix, splits off the command
    /// token, resolves it, then parses the tail against the command's
    /// declared signature.
    pub fn parse_message(&self, registry: &CommandRegistry, text: &str) -> ParsedMessage {
        let Some(body) = text.strip_prefix(&self.prefix) else {
            return ParsedMessage::none();
        };
        let body = body.trim_start();
        let (token, tail) = match body.split_once(char::is_whitespace) {
            Some((token, tail)) => (token, tail),
            None => (body, ""),
        };
        if token.is_empty() {
            return ParsedMessage::none();
        }
        let Some(command) = registry.resolve(token) else {
            return ParsedMessage::none();
        };
        let args = Self::parse_tail(&command, tail);
        ParsedMessage {
            command: Some(command),
            args,
        }
    }

    /// Split the argument tail per the command's signature: `key=value`
    /// tokens bind declared parameters as keywords (undeclared keys land
    /// in `extra`); bare tokens are positional; overflow tokens are
    /// joined into a trailing rest argument when one is declared.
    fn parse_tail(command: &Command, tail: &str) -> Args {
        let signature = command.signature();
        let mut args = Args::default();

        for token in tail.split_whitespace() {
            match token.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    if signature.params.iter().any(|p| p == key) {
                        args.keyword.insert(key.to_string(), value.to_string());
                    } else {
                        args.extra.insert(key.to_string(), value.to_string());
                    }
                }
                _ => args.positional.push(token.to_string()),
            }
        }

        if signature.rest.is_some() && args.positional.len() > signature.params.len() {
            let overflow = args.positional.split_off(signature.params.len());
            args.positional.push(overflow.join(" "));
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::core::CommandBuilder;

    fn registry_with(builders: Vec<CommandBuilder>) -> CommandRegistry {
        let registry = CommandRegistry::new(true);
        for builder in builders {
            registry
                .register(builder.build(|_, _| async { Ok(()) }).unwrap())
                .unwrap();
        }
        registry
    }

    #[test]
    fn prefixed_token_resolves_case_insensitively() {
        let registry = registry_with(vec![Command::builder("ping")]);
        let parser = CommandParser::new("!");
        let parsed = parser.parse_message(&registry, "!PING");
        assert_eq!(parsed.command.unwrap().name(), "ping");
        assert!(parsed.args.positional.is_empty());
        assert!(parsed.args.keyword.is_empty());
        assert!(parsed.args.extra.is_empty());
    }

    #[test]
    fn unprefixed_text_is_not_a_command() {
        let registry = registry_with(vec![Command::builder("ping")]);
        let parser = CommandParser::new("!");
        let parsed = parser.parse_message(&registry, "ping");
        assert!(parsed.command.is_none());
        assert_eq!(parsed.args, Args::default());
    }

    #[test]
    fn unknown_token_is_not_a_command() {
        let registry = registry_with(vec![Command::builder("ping")]);
        let parser = CommandParser::new("!");
        assert!(parser.parse_message(&registry, "!pong").command.is_none());
    }

    #[test]
    fn pattern_command_receives_tail_as_positional() {
        let registry = registry_with(vec![Command::builder("echo").pattern(r"^echo-\w+$")]);
        let parser = CommandParser::new("!");
        let parsed = parser.parse_message(&registry, "!echo-foo bar");
        assert_eq!(parsed.command.unwrap().name(), "echo");
        assert_eq!(parsed.args.positional, vec!["bar"]);
    }

    #[test]
    fn keyword_tokens_bind_declared_params_and_extras_split_off() {
        let registry =
            registry_with(vec![Command::builder("deploy").param("env").param("region")]);
        let parser = CommandParser::new("!");
        let parsed = parser.parse_message(&registry, "!deploy env=prod verbose=yes eu-west");
        let args = parsed.args;
        assert_eq!(args.positional, vec!["eu-west"]);
        assert_eq!(args.keyword.get("env").unwrap(), "prod");
        assert_eq!(args.extra.get("verbose").unwrap(), "yes");
    }

    #[test]
    fn rest_parameter_collects_overflow_tokens() {
        let registry = registry_with(vec![Command::builder("say").param("channel").rest("text")]);
        let parser = CommandParser::new("!");
        let parsed = parser.parse_message(&registry, "!say general hello there world");
        assert_eq!(
            parsed.args.positional,
            vec!["general", "hello there world"]
        );
    }

    #[test]
    fn bare_prefix_is_not_a_command() {
        let registry = registry_with(vec![Command::builder("ping")]);
        let parser = CommandParser::new("!");
        assert!(parser.parse_message(&registry, "!").command.is_none());
        assert!(parser.parse_message(&registry, "! ").command.is_none());
    }
}
