//! Per-kind FIFO queues of connections waiting for a partner.

use std::collections::{HashMap, VecDeque};

use super::value_object::{ChatKind, ConnectionId};

/// Waiting queues, one per [`ChatKind`], in arrival order.
#[derive(Debug, Default)]
pub struct WaitingPool {
    queues: HashMap<ChatKind, VecDeque<ConnectionId>>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `connection_id` to the queue of `kind`.
    ///
    /// The caller removes the connection from every queue first.
    pub fn enqueue(&mut self, kind: ChatKind, connection_id: ConnectionId) {
        self.queues.entry(kind).or_default().push_back(connection_id);
    }

    /// Pop the earliest-enqueued connection of `kind`
    pub fn dequeue_next(&mut self, kind: ChatKind) -> Option<ConnectionId> {
        self.queues.get_mut(&kind).and_then(VecDeque::pop_front)
    }

    /// Remove `connection_id` from every queue.
    ///
    /// Returns how many slots were removed. Anything above one means the
    /// connection was waiting in two places at once.
    pub fn remove_if_present(&mut self, connection_id: &ConnectionId) -> usize {
        let mut removed = 0;
        for queue in self.queues.values_mut() {
            let before = queue.len();
            queue.retain(|waiting| waiting != connection_id);
            removed += before - queue.len();
        }
        removed
    }

    /// The kind `connection_id` is currently waiting for, if any
    pub fn waiting_kind(&self, connection_id: &ConnectionId) -> Option<ChatKind> {
        ChatKind::ALL.into_iter().find(|kind| {
            self.queues
                .get(kind)
                .is_some_and(|queue| queue.contains(connection_id))
        })
    }

    pub fn len(&self, kind: ChatKind) -> usize {
        self.queues.get(&kind).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }
}
