use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use filedesk_core::{AuditError, AuditLog, AuditRecord};

use crate::error::classify_sdk_error;

/// Partition key attribute. Every record of a deployment shares one value.
pub(crate) const PARTITION_KEY: &str = "pk";
/// Sort key attribute holding the timestamp item name.
pub(crate) const SORT_KEY: &str = "item_name";

const APP_ATTR: &str = "App";
const TYPE_ATTR: &str = "Type";
const CONTENT_ATTR: &str = "Content";

/// Table settings for [`DynamoDbAuditLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamoDbAuditConfig {
    /// `DynamoDB` table name.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Partition key value shared by all records of this deployment.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for DynamoDbAuditConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_table_name() -> String {
    "filedesk_audit".to_owned()
}

fn default_key_prefix() -> String {
    "filedesk".to_owned()
}

/// `DynamoDB`-backed implementation of [`AuditLog`].
///
/// Records live in a single partition (`pk = key_prefix`) sorted by
/// `item_name`, so "most recent first" is a reverse-order `Query` on the
/// partition.
pub struct DynamoDbAuditLog {
    client: Client,
    table_name: String,
    partition: String,
}

impl DynamoDbAuditLog {
    /// Build a `DynamoDB` client from the shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &DynamoDbAuditConfig) -> Self {
        Self::from_client(Client::new(sdk_config), config)
    }

    /// Create a log around an existing client.
    pub fn from_client(client: Client, config: &DynamoDbAuditConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            partition: config.key_prefix.clone(),
        }
    }

    /// The underlying client, e.g. for [`create_audit_table`](crate::create_audit_table).
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn storage_failure(operation: &str, err: &impl std::error::Error) -> AuditError {
    let err_str = DisplayErrorContext(err).to_string();
    error!(error = %err_str, "DynamoDB {operation} failed");
    classify_sdk_error(&err_str).into()
}

#[async_trait]
impl AuditLog for DynamoDbAuditLog {
    #[instrument(skip(self, entry), fields(table = %self.table_name, item_name = %entry.item_name))]
    async fn record(&self, entry: AuditRecord) -> Result<(), AuditError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&self.partition, &entry)))
            .send()
            .await
            .map_err(|e| storage_failure("put_item", &e))?;

        debug!(kind = %entry.kind, "audit record written");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn query_recent(&self, limit: u32) -> Result<Vec<AuditRecord>, AuditError> {
        let wanted = limit as usize;
        let mut records = Vec::with_capacity(wanted.min(1_000));
        let mut start_key = None;

        while records.len() < wanted {
            let remaining = wanted - records.len();
            let page = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", PARTITION_KEY)
                .expression_attribute_values(":pk", AttributeValue::S(self.partition.clone()))
                .scan_index_forward(false)
                .limit(i32::try_from(remaining).unwrap_or(i32::MAX))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| storage_failure("query", &e))?;

            for item in page.items() {
                match item_to_record(item) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(error = %e, "skipping malformed audit record"),
                }
            }

            start_key = page.last_evaluated_key().cloned();
            if start_key.is_none() {
                break;
            }
        }

        records.truncate(wanted);
        debug!(count = records.len(), "audit records fetched");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Attribute conversion helpers
// ---------------------------------------------------------------------------

fn record_to_item(partition: &str, record: &AuditRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PARTITION_KEY.to_owned(),
            AttributeValue::S(partition.to_owned()),
        ),
        (
            SORT_KEY.to_owned(),
            AttributeValue::S(record.item_name.clone()),
        ),
        (APP_ATTR.to_owned(), AttributeValue::S(record.app.clone())),
        (TYPE_ATTR.to_owned(), AttributeValue::S(record.kind.clone())),
        (
            CONTENT_ATTR.to_owned(),
            AttributeValue::S(record.content.clone()),
        ),
    ])
}

/// Records written by other producers may omit attributes; only the key is
/// mandatory.
fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<AuditRecord, AuditError> {
    let item_name = string_attr(item, SORT_KEY)
        .ok_or_else(|| AuditError::Serialization(format!("missing '{SORT_KEY}' attribute")))?;

    Ok(AuditRecord {
        item_name,
        app: string_attr(item, APP_ATTR).unwrap_or_default(),
        kind: string_attr(item, TYPE_ATTR).unwrap_or_default(),
        content: string_attr(item, CONTENT_ATTR).unwrap_or_default(),
    })
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn sample() -> AuditRecord {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 10, 30, 0).unwrap();
        AuditRecord::at(at, "webapp", "Files to process", r#"["a.txt","b.txt"]"#)
    }

    #[test]
    fn item_uses_partition_and_sort_key() {
        let item = record_to_item("filedesk", &sample());
        assert_eq!(item.get("pk"), Some(&AttributeValue::S("filedesk".into())));
        assert_eq!(
            item.get("item_name"),
            Some(&AttributeValue::S("2024-02-29 10:30:00.000000".into()))
        );
        assert_eq!(
            item.get("Type"),
            Some(&AttributeValue::S("Files to process".into()))
        );
    }

    #[test]
    fn item_roundtrips_to_record() {
        let record = sample();
        let parsed = item_to_record(&record_to_item("filedesk", &record)).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn missing_optional_attributes_default_to_empty() {
        let item = HashMap::from([
            ("pk".to_owned(), AttributeValue::S("filedesk".into())),
            (
                "item_name".to_owned(),
                AttributeValue::S("2024-01-01 00:00:00.000000".into()),
            ),
            ("App".to_owned(), AttributeValue::S("worker".into())),
        ]);
        let record = item_to_record(&item).unwrap();
        assert_eq!(record.app, "worker");
        assert!(record.kind.is_empty());
        assert!(record.content.is_empty());
    }

    #[test]
    fn missing_item_name_is_rejected() {
        let item = HashMap::from([("App".to_owned(), AttributeValue::S("webapp".into()))]);
        assert!(matches!(
            item_to_record(&item),
            Err(AuditError::Serialization(_))
        ));
    }

    #[test]
    fn non_string_item_name_is_rejected() {
        let item = HashMap::from([("item_name".to_owned(), AttributeValue::N("1".into()))]);
        assert!(item_to_record(&item).is_err());
    }

    #[test]
    fn config_defaults() {
        let config = DynamoDbAuditConfig::default();
        assert_eq!(config.table_name, "filedesk_audit");
        assert_eq!(config.key_prefix, "filedesk");

        let parsed: DynamoDbAuditConfig =
            serde_json::from_value(serde_json::json!({ "table_name": "audit" })).unwrap();
        assert_eq!(parsed.table_name, "audit");
        assert_eq!(parsed.key_prefix, "filedesk");
    }
}
