mod audit;
mod server;
mod storage;
mod telemetry;


pub use audit::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;

use filedesk_aws::AwsBaseConfig;
use serde::Deserialize;

/// Top-level configuration for the filedesk server, loaded from a TOML file.
///
/// Every section is optional; an empty file yields a server on
/// `127.0.0.1:8080` using the in-memory backends.
#[derive(Debug, Default, Deserialize)]
pub struct FiledeskConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Which service backends to use.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Shared AWS connection settings (used by the `aws` backend).
    #[serde(default)]
    pub aws: AwsBaseConfig,
    /// Blob store (bucket) configuration.
    #[serde(default)]
    pub blob: BlobConfig,
    /// Processing queue configuration.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Audit log configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
