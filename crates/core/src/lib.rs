//! Core abstractions for the filedesk web front-end.
//!
//! filedesk keeps no state of its own. Files live in a blob store, processing
//! requests go to a message queue and every notable action is appended to an
//! audit log. This crate defines the three service seams:
//!
//! - [`BlobStore`]: put/get/delete/list objects by name in a single bucket
//! - [`MessageQueue`]: enqueue one message body per file name
//! - [`AuditLog`]: append timestamp-keyed records and read back the newest
//!
//! Backends live in `filedesk-memory` (in-process) and `filedesk-aws`
//! (S3, SQS and `DynamoDB`).

pub mod audit;
pub mod blob;
pub mod error;
pub mod queue;
pub mod sanitize;

pub use audit::{AuditLog, AuditRecord, ITEM_NAME_FORMAT, item_name};
pub use blob::{BlobStore, StoredObject, without_reserved};
pub use error::{AuditError, BlobError, QueueError};
pub use queue::MessageQueue;
pub use sanitize::sanitize_filename;
