use async_trait::async_trait;

use crate::error::QueueError;

/// Fire-and-forget message queue.
///
/// Delivery and consumption happen outside filedesk; a successful send only
/// means the queue accepted the message.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Enqueue one message and return the id assigned by the queue.
    async fn send(&self, body: &str) -> Result<String, QueueError>;
}
