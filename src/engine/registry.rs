// src/engine/registry.rs

//! Task kind → handler table.

use std::collections::HashMap;
use std::fmt;

use super::task::{TaskKind, TaskPacket};
use crate::errors::HandlerError;

/// Handler signature: the owner-thread context plus the packet being run.
pub type Handler<C> = fn(&mut C, &TaskPacket) -> Result<(), HandlerError>;

/// Fixed lookup table built once at startup.
///
/// The registry carries no control flow; the dispatcher decides when and how
/// handlers run. A kind without an entry is a wiring defect reported by
/// [`ActionRegistry::missing`] and, at dispatch time, as
/// `DispatchError::Unregistered`.
pub struct ActionRegistry<C> {
    handlers: HashMap<TaskKind, Handler<C>>,
}

impl<C> ActionRegistry<C> {
    pub fn builder() -> RegistryBuilder<C> {
        RegistryBuilder {
            handlers: HashMap::new(),
        }
    }

    pub fn get(&self, kind: TaskKind) -> Option<Handler<C>> {
        self.handlers.get(&kind).copied()
    }

    /// Kinds with no registered handler, in declaration order.
    pub fn missing(&self) -> Vec<TaskKind> {
        TaskKind::ALL
            .into_iter()
            .filter(|k| !self.handlers.contains_key(k))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.handlers.keys().map(|k| k.to_string()).collect();
        kinds.sort();
        f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
    }
}

pub struct RegistryBuilder<C> {
    handlers: HashMap<TaskKind, Handler<C>>,
}

impl<C> RegistryBuilder<C> {
    /// Register `handler` for `kind`, replacing any previous entry.
    pub fn register(mut self, kind: TaskKind, handler: Handler<C>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn build(self) -> ActionRegistry<C> {
        ActionRegistry {
            handlers: self.handlers,
        }
    }
}
