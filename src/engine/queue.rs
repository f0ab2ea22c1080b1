// src/engine/queue.rs

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::task::TaskPacket;

/// FIFO queue of pending task packets.
///
/// Semantics:
/// - Any thread may push; only the owner thread pops (through the
///   dispatcher).
/// - `pop` never blocks on emptiness; an empty queue is a normal state.
/// - `push_batch` appends a whole gesture under one lock, so bursts coming
///   from different producers never interleave.
/// - Capacity is unbounded.
#[derive(Debug, Default)]
pub struct TaskQueue {
    inner: Mutex<VecDeque<TaskPacket>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a packet at the tail.
    pub fn push(&self, packet: TaskPacket) {
        debug!(task = %packet.kind, "queued task");
        self.lock().push_back(packet);
    }

    /// Append several packets at the tail, contiguously and in order.
    pub fn push_batch(&self, packets: impl IntoIterator<Item = TaskPacket>) {
        let mut queue = self.lock();
        let before = queue.len();
        queue.extend(packets);
        debug!(pushed = queue.len() - before, "queued task burst");
    }

    /// Remove and return the head, or `None` if the queue is empty.
    pub fn pop(&self) -> Option<TaskPacket> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if there are no pending packets.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every pending packet, returning how many were discarded.
    ///
    /// Only used when a shutdown must not run the remaining work.
    pub fn clear(&self) -> usize {
        let mut queue = self.lock();
        let dropped = queue.len();
        queue.clear();
        if dropped > 0 {
            warn!(dropped, "discarded pending tasks");
        }
        dropped
    }

    /// Run `f` with exclusive access to the pending packets.
    ///
    /// Anything `f` makes visible to other threads becomes visible together
    /// with its queue edits: a consumer that observes the side effect and
    /// then pops will also observe the edits.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut VecDeque<TaskPacket>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the pending packets, head first.
    pub fn snapshot(&self) -> Vec<TaskPacket> {
        self.lock().iter().cloned().collect()
    }

    // A producer that panicked while holding the lock cannot leave the deque
    // half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, VecDeque<TaskPacket>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
