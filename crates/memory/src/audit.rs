use async_trait::async_trait;
use dashmap::DashMap;

use filedesk_core::{AuditError, AuditLog, AuditRecord};

/// In-memory audit log using `DashMap`, keyed by item name.
///
/// Like the `DynamoDB` backend, a record whose item name already exists
/// replaces the stored one.
#[derive(Default)]
pub struct MemoryAuditLog {
    records: DashMap<String, AuditRecord>,
}

impl MemoryAuditLog {
    /// Create an empty audit log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, entry: AuditRecord) -> Result<(), AuditError> {
        self.records.insert(entry.item_name.clone(), entry);
        Ok(())
    }

    async fn query_recent(&self, limit: u32) -> Result<Vec<AuditRecord>, AuditError> {
        let mut all: Vec<AuditRecord> = self.records.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.item_name.cmp(&a.item_name));
        all.truncate(limit as usize);
        Ok(all)
    }
}
