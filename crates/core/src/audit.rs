use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// `chrono` format for audit item names.
///
/// Fixed width and zero padded so that lexicographic order of item names is
/// chronological order. The fractional part is always six digits.
pub const ITEM_NAME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format a timestamp as an audit item name.
pub fn item_name(at: DateTime<Utc>) -> String {
    at.format(ITEM_NAME_FORMAT).to_string()
}

/// A single audit log entry.
///
/// Records are immutable once written. Two records created within the same
/// microsecond share an item name and the later write replaces the earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Timestamp key (see [`ITEM_NAME_FORMAT`]).
    pub item_name: String,
    /// Application that produced the record (e.g. `"webapp"`).
    pub app: String,
    /// Kind of action (e.g. `"Get file"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form description of the action.
    pub content: String,
}

impl AuditRecord {
    /// Create a record keyed by the current UTC time.
    pub fn new(
        app: impl Into<String>,
        kind: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::at(Utc::now(), app, kind, content)
    }

    /// Create a record keyed by the given time.
    pub fn at(
        at: DateTime<Utc>,
        app: impl Into<String>,
        kind: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name(at),
            app: app.into(),
            kind: kind.into(),
            content: content.into(),
        }
    }
}

/// Append-only audit log keyed by timestamp.
///
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Persist a fully built record.
    async fn record(&self, entry: AuditRecord) -> Result<(), AuditError>;

    /// Return up to `limit` records, newest first (descending item name).
    async fn query_recent(&self, limit: u32) -> Result<Vec<AuditRecord>, AuditError>;

    /// Build a record keyed by the current time and persist it.
    async fn append(&self, app: &str, kind: &str, content: &str) -> Result<AuditRecord, AuditError> {
        let entry = AuditRecord::new(app, kind, content);
        self.record(entry.clone()).await?;
        Ok(entry)
    }
}
