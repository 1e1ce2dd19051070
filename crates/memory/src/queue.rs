use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use filedesk_core::{MessageQueue, QueueError};

/// In-memory queue that keeps every sent message for inspection.
///
/// Messages are never consumed; [`MemoryQueue::messages`] returns them in
/// send order.
#[derive(Default)]
pub struct MemoryQueue {
    next_id: AtomicU64,
    messages: DashMap<u64, String>,
}

impl MemoryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// All message bodies sent so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        let mut entries: Vec<(u64, String)> = self
            .messages
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, body)| body).collect()
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn send(&self, body: &str) -> Result<String, QueueError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.messages.insert(id, body.to_owned());
        debug!(message_id = id, "message queued in memory");
        Ok(format!("mem-{id}"))
    }
}
