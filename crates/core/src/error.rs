use thiserror::Error;

/// Errors returned by [`BlobStore`](crate::BlobStore) implementations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// No object exists under the requested name.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The storage service rejected or failed the request.
    #[error("blob storage error: {0}")]
    Storage(String),

    /// The storage service could not be reached.
    #[error("blob storage connection error: {0}")]
    Connection(String),

    /// The storage service throttled the request.
    #[error("blob storage request throttled")]
    Throttled,
}

/// Errors returned by [`MessageQueue`](crate::MessageQueue) implementations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue service rejected or failed the send.
    #[error("queue send failed: {0}")]
    Send(String),

    /// The queue service could not be reached.
    #[error("queue connection error: {0}")]
    Connection(String),

    /// The queue service throttled the request.
    #[error("queue request throttled")]
    Throttled,

    /// The queue could not be resolved from configuration.
    #[error("invalid queue configuration: {0}")]
    Configuration(String),
}

/// Errors returned by [`AuditLog`](crate::AuditLog) implementations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// An error from the underlying log store.
    #[error("audit storage error: {0}")]
    Storage(String),

    /// A stored item could not be mapped to an [`AuditRecord`](crate::AuditRecord).
    #[error("audit serialization error: {0}")]
    Serialization(String),
}
