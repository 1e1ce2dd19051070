use filedesk_core::{AuditError, BlobError, QueueError};
use thiserror::Error;

/// A classified AWS SDK failure.
#[derive(Debug, Error)]
pub enum AwsError {
    /// The service returned an error.
    #[error("AWS service error: {0}")]
    ServiceError(String),

    /// The service throttled the request.
    #[error("AWS request throttled")]
    Throttled,

    /// The service could not be reached.
    #[error("AWS connection error: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("AWS request timed out")]
    Timeout,
}

impl From<AwsError> for BlobError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::ServiceError(msg) => BlobError::Storage(msg),
            AwsError::Throttled => BlobError::Throttled,
            AwsError::Connection(msg) => BlobError::Connection(msg),
            AwsError::Timeout => BlobError::Connection("request timed out".to_owned()),
        }
    }
}

impl From<AwsError> for QueueError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::ServiceError(msg) => QueueError::Send(msg),
            AwsError::Throttled => QueueError::Throttled,
            AwsError::Connection(msg) => QueueError::Connection(msg),
            AwsError::Timeout => QueueError::Connection("request timed out".to_owned()),
        }
    }
}

impl From<AwsError> for AuditError {
    fn from(err: AwsError) -> Self {
        AuditError::Storage(err.to_string())
    }
}

/// Classify an AWS SDK error message into an [`AwsError`].
///
/// Matches on common throttling, timeout and connectivity phrases; anything
/// else is a service error carrying the original message.
pub fn classify_sdk_error(error_str: &str) -> AwsError {
    let lower = error_str.to_lowercase();
    if lower.contains("throttl") || lower.contains("rate exceed") || lower.contains("slow down") {
        AwsError::Throttled
    } else if lower.contains("timeout") || lower.contains("timed out") {
        AwsError::Timeout
    } else if lower.contains("dispatch failure")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("network")
    {
        AwsError::Connection(error_str.to_owned())
    } else {
        AwsError::ServiceError(error_str.to_owned())
    }
}
