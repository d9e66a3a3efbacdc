//! Two-tier command registry: exact-name table plus ordered pattern rules.

use super::core::Command;
use crate::error::CommandError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from command name to definition.
///
/// Resolution is two-tier: an exact-match table checked first, then the
/// pattern commands in registration order. Duplicate plain names are a
/// hard registration error; unregistering an absent name is too.
pub struct CommandRegistry {
    exact: RwLock<HashMap<String, Arc<Command>>>,
    patterns: RwLock<Vec<Arc<Command>>>,
    fold_case: bool,
}

impl CommandRegistry {
    /// Create an empty registry. `fold_case` applies registry-wide to
    /// exact-name keys and lookups.
    pub fn new(fold_case: bool) -> Self {
        CommandRegistry {
            exact: RwLock::new(HashMap::new()),
            patterns: RwLock::new(Vec::new()),
            fold_case,
        }
    }

    fn key(&self, name: &str) -> String {
        if self.fold_case {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Register a command. Pattern commands also enter the ordered rule
    /// list; their names still occupy the exact table so duplicates fail
    /// loudly either way.
    pub fn register(&self, command: Command) -> Result<Arc<Command>, CommandError> {
        let key = self.key(command.name());
        let command = Arc::new(command);
        let mut exact = self.exact.write();
        if exact.contains_key(&key) {
            return Err(CommandError::Duplicate(command.name().to_string()));
        }
        exact.insert(key, command.clone());
        if command.is_pattern() {
            self.patterns.write().push(command.clone());
        }
        Ok(command)
    }

    /// Remove a command by name. Absent names are an explicit error.
    pub fn unregister(&self, name: &str) -> Result<Arc<Command>, CommandError> {
        let key = self.key(name);
        let removed = self
            .exact
            .write()
            .remove(&key)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
        if removed.is_pattern() {
            self.patterns
                .write()
                .retain(|cmd| !Arc::ptr_eq(cmd, &removed));
        }
        Ok(removed)
    }

    /// Resolve a command token: exact table first, then the first pattern
    /// rule that accepts it. Pattern commands reserve their name in the
    /// exact table but resolve only by rule. `None` means "not a
    /// command", not an error.
    pub fn resolve(&self, token: &str) -> Option<Arc<Command>> {
        if let Some(found) = self.exact.read().get(&self.key(token)) {
            if !found.is_pattern() {
                return Some(found.clone());
            }
        }
        self.patterns
            .read()
            .iter()
            .find(|cmd| cmd.matches(token, self.fold_case))
            .cloned()
    }

    /// All registered commands, for the help listing. Sorted by name so
    /// output is stable.
    pub fn all(&self) -> Vec<Arc<Command>> {
        let mut commands: Vec<_> = self.exact.read().values().cloned().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }
}
