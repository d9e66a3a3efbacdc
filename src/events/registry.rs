//! Listener table: ordered persistent and one-shot handler sequences.

use super::{EventHandler, HandlerKind};
use crate::error::RegistryError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type HandlerSeq = Vec<Arc<dyn EventHandler>>;

/// Two mappings from lowercased event name to ordered handler sequences:
/// persistent handlers survive dispatch, one-shot handlers are drained
/// atomically the first time their event fires.
///
/// Mutation is expected from setup code before heavy dispatch begins; the
/// locks make concurrent mutation memory-safe but promise no ordering
/// relative to in-flight dispatches.
#[derive(Default)]
pub struct ListenerTable {
    persistent: RwLock<HashMap<String, HandlerSeq>>,
    one_shot: RwLock<HashMap<String, HandlerSeq>>,
}

impl ListenerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    ///
    /// `name` defaults to the handler's declared identity. With
    /// `overwrite` the whole sequence for that (name, once-ness) is
    /// replaced by a fresh singleton; otherwise the handler is appended.
    /// Handlers declaring [`HandlerKind::Blocking`] are rejected.
    pub fn register(
        &self,
        name: Option<&str>,
        handler: Arc<dyn EventHandler>,
        once: bool,
        overwrite: bool,
    ) -> Result<(), RegistryError> {
        if handler.kind() == HandlerKind::Blocking {
            return Err(RegistryError::InvalidHandlerKind(
                handler.name().to_string(),
            ));
        }
        let key = name.unwrap_or_else(|| handler.name()).to_ascii_lowercase();
        let table = if once { &self.one_shot } else { &self.persistent };
        let mut map = table.write();
        let seq = map.entry(key).or_default();
        if overwrite {
            seq.clear();
        }
        seq.push(handler);
        Ok(())
    }

    /// Persistent handlers for `name`, in registration order.
    pub fn lookup(&self, name: &str) -> HandlerSeq {
        self.persistent
            .read()
            .get(&name.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Atomically remove and return the whole one-shot sequence for
    /// `name`. Once drained, a second dispatch of the same name finds
    /// nothing, even if the first dispatch failed partway.
    pub fn dequeue_once(&self, name: &str) -> HandlerSeq {
        self.one_shot
            .write()
            .remove(&name.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerResult;
    use crate::events::{Event, handler};

    fn named(name: &str) -> Arc<dyn EventHandler> {
        handler(name, |_event: Event| async { Ok(()) as HandlerResult })
    }

    struct BlockingHandler;

    #[async_trait::async_trait]
    impl EventHandler for BlockingHandler {
        fn name(&self) -> &str {
            "spin"
        }
        fn kind(&self) -> HandlerKind {
            HandlerKind::Blocking
        }
        async fn call(&self, _event: Event) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn repeated_registration_appends_in_call_order() {
        let table = ListenerTable::new();
        for name in ["a", "b", "c"] {
            table.register(Some("ev"), named(name), false, false).unwrap();
        }
        let seq = table.lookup("ev");
        let names: Vec<_> = seq.iter().map(|h| h.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn overwrite_replaces_the_entire_sequence() {
        let table = ListenerTable::new();
        table.register(Some("ev"), named("old1"), false, false).unwrap();
        table.register(Some("ev"), named("old2"), false, false).unwrap();
        table.register(Some("ev"), named("fresh"), false, true).unwrap();
        table.register(Some("ev"), named("after"), false, false).unwrap();
        let names: Vec<_> = table
            .lookup("ev")
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, ["fresh", "after"]);
    }

    #[test]
    fn name_defaults_to_handler_identity_and_folds_case() {
        let table = ListenerTable::new();
        table.register(None, named("Ready"), false, false).unwrap();
        assert_eq!(table.lookup("ready").len(), 1);
        assert_eq!(table.lookup("READY").len(), 1);
    }

    #[test]
    fn dequeue_once_drains_atomically() {
        let table = ListenerTable::new();
        table.register(Some("ev"), named("x"), true, false).unwrap();
        table.register(Some("ev"), named("y"), true, false).unwrap();
        assert_eq!(table.dequeue_once("ev").len(), 2);
        assert!(table.dequeue_once("ev").is_empty());
        // Persistent table untouched.
        assert!(table.lookup("ev").is_empty());
    }

    #[test]
    fn blocking_handlers_are_rejected_at_registration() {
        let table = ListenerTable::new();
        let err = table
            .register(Some("ev"), Arc::new(BlockingHandler), false, false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidHandlerKind(name) if name == "spin"));
        assert!(table.lookup("ev").is_empty());
    }
}
