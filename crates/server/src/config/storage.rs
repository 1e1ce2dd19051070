use filedesk_aws::{S3Config, SqsConfig};
use serde::Deserialize;

/// Backend selection.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// `"memory"` (in-process, lost on restart) or `"aws"` (S3, SQS, `DynamoDB`).
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

/// Blob store configuration.
#[derive(Debug, Deserialize)]
pub struct BlobConfig {
    /// Bucket holding uploaded files.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Use path-style S3 addressing (`LocalStack`, `MinIO`).
    #[serde(default)]
    pub force_path_style: bool,
    /// Object names starting with this prefix are internal and never listed.
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
    /// Content type served by `/getfile` when neither the stored metadata nor
    /// the file extension identify one.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

impl BlobConfig {
    /// The S3 settings for this bucket.
    pub fn s3(&self) -> S3Config {
        S3Config::new(&self.bucket).with_force_path_style(self.force_path_style)
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            force_path_style: false,
            reserved_prefix: default_reserved_prefix(),
            default_content_type: default_content_type(),
        }
    }
}

fn default_bucket() -> String {
    "filedesk-files".to_owned()
}

fn default_reserved_prefix() -> String {
    "logs".to_owned()
}

fn default_content_type() -> String {
    "image/jpeg".to_owned()
}

/// Processing queue configuration.
///
/// `queue_url` takes precedence; otherwise `queue_name` is resolved to a URL
/// at startup.
#[derive(Debug, Deserialize)]
pub struct QueueConfig {
    /// Full SQS queue URL.
    #[serde(default)]
    pub queue_url: Option<String>,
    /// SQS queue name.
    #[serde(default = "default_queue_name")]
    pub queue_name: Option<String>,
}

impl QueueConfig {
    /// The SQS settings for this queue.
    pub fn sqs(&self) -> SqsConfig {
        SqsConfig {
            queue_url: self.queue_url.clone(),
            queue_name: self.queue_name.clone(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_url: None,
            queue_name: default_queue_name(),
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_queue_name() -> Option<String> {
    Some("filedesk-jobs".to_owned())
}
