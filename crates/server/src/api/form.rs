use axum::extract::{FromRequest, Request};
use bytes::Bytes;

use crate::error::ServerError;

/// File names submitted as repeated `file` fields of an urlencoded form.
///
/// Other fields are ignored; an empty selection is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFiles(pub Vec<String>);

impl SelectedFiles {
    /// Parse an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &[u8]) -> Result<Self, ServerError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ServerError::BadRequest(format!("invalid form body: {e}")))?;
        Ok(Self(
            pairs
                .into_iter()
                .filter(|(key, _)| key == "file")
                .map(|(_, value)| value)
                .collect(),
        ))
    }
}

impl<S> FromRequest<S> for SelectedFiles
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        Self::parse(&body)
    }
}
