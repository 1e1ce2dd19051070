use filedesk_aws::DynamoDbAuditConfig;
use serde::Deserialize;

/// Audit log configuration.
#[derive(Debug, Deserialize)]
pub struct AuditConfig {
    /// `DynamoDB` table holding audit records.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Partition key value shared by this deployment's records.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Value written to the `App` attribute of every record.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Maximum number of records shown on `/logs`.
    #[serde(default = "default_log_limit")]
    pub log_limit: u32,
    /// Create the table on startup when it does not exist.
    #[serde(default = "default_create_table")]
    pub create_table: bool,
    /// Fail requests whose audit write fails.
    ///
    /// When `false` (the default) audit failures are logged and the request
    /// carries on.
    #[serde(default)]
    pub strict: bool,
}

impl AuditConfig {
    /// The `DynamoDB` settings for this log.
    pub fn dynamodb(&self) -> DynamoDbAuditConfig {
        DynamoDbAuditConfig {
            table_name: self.table_name.clone(),
            key_prefix: self.key_prefix.clone(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            key_prefix: default_key_prefix(),
            app_name: default_app_name(),
            log_limit: default_log_limit(),
            create_table: default_create_table(),
            strict: false,
        }
    }
}

fn default_table_name() -> String {
    "filedesk_audit".to_owned()
}

fn default_key_prefix() -> String {
    "filedesk".to_owned()
}

fn default_app_name() -> String {
    "webapp".to_owned()
}

fn default_log_limit() -> u32 {
    500
}

fn default_create_table() -> bool {
    true
}
