use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filedesk_core::{AuditError, BlobError, QueueError};
use thiserror::Error;

/// Errors that can occur when running the filedesk server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A blob store call failed.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A queue call failed.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// An audit log call failed.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl ServerError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Blob(BlobError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
