//! Command definitions and execution.

use super::context::Context;
use crate::error::{CommandError, HandlerError, HandlerResult};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Result type for command bodies.
pub type CommandResult = HandlerResult;

type BoxFuture = Pin<Box<dyn Future<Output = CommandResult> + Send>>;
type Callback = Box<dyn Fn(Context, Args) -> BoxFuture + Send + Sync>;

/// Declared argument signature of a command.
///
/// Bare tokens fill `params` in order; a trailing `rest` parameter, when
/// declared, swallows any overflow tokens joined back into one argument.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    /// Ordered positional parameter names.
    pub params: Vec<String>,
    /// Optional trailing parameter that collects the remainder.
    pub rest: Option<String>,
}

/// Parsed arguments for one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Positional arguments, in message order.
    pub positional: Vec<String>,
    /// `key=value` tokens whose key is a declared parameter.
    pub keyword: HashMap<String, String>,
    /// `key=value` tokens with undeclared keys.
    pub extra: HashMap<String, String>,
}

/// A registered command: identity, optional pattern-match mode, declared
/// signature, and the body to invoke.
pub struct Command {
    name: String,
    pattern: Option<Regex>,
    signature: Signature,
    description: Option<String>,
    callback: Callback,
}

impl Command {
    /// Start building a command with the given plain name.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            pattern: None,
            pattern_case_insensitive: false,
            signature: Signature::default(),
            description: None,
        }
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this command matches by pattern rule instead of exact name.
    pub fn is_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Help text, when provided.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared argument signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether this command accepts `token`. Exact commands compare names
    /// (case-folded when the parser is configured that way); pattern
    /// commands evaluate their rule under its own configured flags.
    pub fn matches(&self, token: &str, fold_case: bool) -> bool {
        match &self.pattern {
            Some(rule) => rule.is_match(token),
            None if fold_case => self.name.eq_ignore_ascii_case(token),
            None => self.name == token,
        }
    }

    /// Invoke the command body with the invocation context prepended.
    ///
    /// Every declared parameter must be supplied, positionally or as a
    /// keyword; the first unsatisfied one fails the invocation with
    /// [`HandlerError::MissingArgument`]. Errors propagate to the caller;
    /// the command router surfaces them through the dispatch failure path.
    pub async fn execute(&self, ctx: Context, args: Args) -> CommandResult {
        let required: Vec<&String> = self
            .signature
            .params
            .iter()
            .filter(|p| !args.keyword.contains_key(p.as_str()))
            .collect();
        if args.positional.len() < required.len() {
            return Err(HandlerError::MissingArgument(
                required[args.positional.len()].clone(),
            ));
        }
        (self.callback)(ctx, args).await
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Command`].
pub struct CommandBuilder {
    name: String,
    pattern: Option<String>,
    pattern_case_insensitive: bool,
    signature: Signature,
    description: Option<String>,
}

impl CommandBuilder {
    /// Match by regex rule instead of exact name.
    pub fn pattern(mut self, rule: impl Into<String>) -> Self {
        self.pattern = Some(rule.into());
        self
    }

    /// Evaluate the pattern rule case-insensitively.
    pub fn pattern_case_insensitive(mut self, yes: bool) -> Self {
        self.pattern_case_insensitive = yes;
        self
    }

    /// Declare a positional parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.signature.params.push(name.into());
        self
    }

    /// Declare a trailing parameter that collects overflow tokens.
    pub fn rest(mut self, name: impl Into<String>) -> Self {
        self.signature.rest = Some(name.into());
        self
    }

    /// Attach help text.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Finish with an async body.
    pub fn build<F, Fut>(self, body: F) -> Result<Command, CommandError>
    where
        F: Fn(Context, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        let pattern = match self.pattern {
            Some(rule) => Some(
                RegexBuilder::new(&rule)
                    .case_insensitive(self.pattern_case_insensitive)
                    .build()?,
            ),
            None => None,
        };
        Ok(Command {
            name: self.name,
            pattern,
            signature: self.signature,
            description: self.description,
            callback: Box::new(move |ctx, args| Box::pin(body(ctx, args))),
        })
    }
}
