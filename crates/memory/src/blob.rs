use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use filedesk_core::{BlobError, BlobStore, StoredObject};

/// In-memory blob store using `DashMap`, keyed by object name.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, StoredObject>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list_all(&self) -> Result<Vec<String>, BlobError> {
        // Match S3, which lists keys in ascending UTF-8 order.
        let mut names: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), BlobError> {
        self.objects.insert(
            name.to_owned(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_owned),
            },
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<StoredObject, BlobError> {
        self.objects
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BlobError::NotFound(name.to_owned()))
    }

    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        self.objects.remove(name);
        Ok(())
    }
}
