//! AWS backends for filedesk.
//!
//! - **S3**: [`S3BlobStore`] implements `BlobStore` over one bucket
//! - **SQS**: [`SqsQueue`] implements `MessageQueue` over one queue
//! - **`DynamoDB`**: [`DynamoDbAuditLog`] implements `AuditLog` over one table
//!
//! All three are built from a single SDK configuration produced by
//! [`build_sdk_config`](auth::build_sdk_config) from an [`AwsBaseConfig`].

pub mod auth;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod s3;
pub mod sqs;
pub mod table;

// Re-exports for convenience.
pub use auth::build_sdk_config;
pub use config::AwsBaseConfig;
pub use dynamodb::{DynamoDbAuditConfig, DynamoDbAuditLog};
pub use error::{AwsError, classify_sdk_error};
pub use s3::{S3BlobStore, S3Config};
pub use sqs::{SqsConfig, SqsQueue};
pub use table::create_audit_table;
