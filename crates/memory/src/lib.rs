//! In-process backends for filedesk.
//!
//! Nothing here survives a restart. These stores back the `memory` storage
//! backend for local development and stand in for the AWS services in tests.

mod audit;
mod blob;
mod queue;

pub use audit::MemoryAuditLog;
pub use blob::MemoryBlobStore;
pub use queue::MemoryQueue;
