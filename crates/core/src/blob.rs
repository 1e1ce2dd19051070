use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Content and metadata of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw object bytes.
    pub data: Bytes,
    /// Content type recorded at upload time, if any.
    pub content_type: Option<String>,
}

/// Object storage scoped to a single bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Return the name of every object in the bucket.
    async fn list_all(&self) -> Result<Vec<String>, BlobError>;

    /// Store `data` under `name`, replacing any existing object.
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), BlobError>;

    /// Fetch an object. Fails with [`BlobError::NotFound`] if absent.
    async fn get(&self, name: &str) -> Result<StoredObject, BlobError>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, name: &str) -> Result<(), BlobError>;
}

/// Drop names that start with `reserved_prefix`.
///
/// An empty prefix reserves nothing.
pub fn without_reserved(names: Vec<String>, reserved_prefix: &str) -> Vec<String> {
    if reserved_prefix.is_empty() {
        return names;
    }
    names
        .into_iter()
        .filter(|name| !name.starts_with(reserved_prefix))
        .collect()
}
