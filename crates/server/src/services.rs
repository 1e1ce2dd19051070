use std::sync::Arc;

use tracing::info;

use filedesk_aws::{DynamoDbAuditLog, S3BlobStore, SqsQueue, build_sdk_config, create_audit_table};
use filedesk_core::{AuditLog, BlobStore, MessageQueue};
use filedesk_memory::{MemoryAuditLog, MemoryBlobStore, MemoryQueue};

use crate::config::FiledeskConfig;
use crate::error::ServerError;

/// The three service handles every handler works against.
#[derive(Clone)]
pub struct Services {
    pub blobs: Arc<dyn BlobStore>,
    pub queue: Arc<dyn MessageQueue>,
    pub audit: Arc<dyn AuditLog>,
}

impl Services {
    /// In-process backends. Nothing survives a restart.
    pub fn memory() -> Self {
        Self {
            blobs: Arc::new(MemoryBlobStore::new()),
            queue: Arc::new(MemoryQueue::new()),
            audit: Arc::new(MemoryAuditLog::new()),
        }
    }
}

/// Create the service backends selected by `[storage] backend`.
pub async fn create_services(config: &FiledeskConfig) -> Result<Services, ServerError> {
    let services = match config.storage.backend.as_str() {
        "memory" => Services::memory(),
        "aws" => create_aws_services(config).await?,
        other => {
            return Err(ServerError::Config(format!(
                "unknown storage backend: {other}"
            )));
        }
    };
    info!(backend = %config.storage.backend, "service backends initialized");
    Ok(services)
}

async fn create_aws_services(config: &FiledeskConfig) -> Result<Services, ServerError> {
    let sdk_config = build_sdk_config(&config.aws).await;

    let blobs = S3BlobStore::new(&sdk_config, &config.blob.s3());
    info!(bucket = %blobs.bucket(), "S3 blob store ready");

    let queue = SqsQueue::new(&sdk_config, &config.queue.sqs())
        .await
        .map_err(|e| ServerError::Config(format!("queue: {e}")))?;
    info!(queue_url = %queue.queue_url(), "SQS queue ready");

    let audit_config = config.audit.dynamodb();
    let audit = DynamoDbAuditLog::new(&sdk_config, &audit_config);
    if config.audit.create_table {
        create_audit_table(audit.client(), &audit_config.table_name)
            .await
            .map_err(|e| ServerError::Config(format!("audit table: {e}")))?;
    }
    info!(table = %audit_config.table_name, "DynamoDB audit log ready");

    Ok(Services {
        blobs: Arc::new(blobs),
        queue: Arc::new(queue),
        audit: Arc::new(audit),
    })
}
