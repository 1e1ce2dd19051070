use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use filedesk_core::{BlobError, BlobStore, StoredObject};

use crate::error::classify_sdk_error;

/// Bucket settings for [`S3BlobStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket holding every uploaded file.
    pub bucket: String,

    /// Use path-style addressing (`LocalStack`, `MinIO`).
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Config {
    /// Create a config for the given bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            force_path_style: false,
        }
    }

    /// Enable or disable path-style addressing.
    #[must_use]
    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }
}

/// [`BlobStore`] backed by a single S3 bucket.
pub struct S3BlobStore {
    bucket: String,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("bucket", &self.bucket)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3BlobStore {
    /// Build an S3 client from the shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &S3Config) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(config.force_path_style)
            .build();
        Self::with_client(aws_sdk_s3::Client::from_conf(s3_config), config)
    }

    /// Create a store around a pre-built client.
    pub fn with_client(client: aws_sdk_s3::Client, config: &S3Config) -> Self {
        Self {
            bucket: config.bucket.clone(),
            client,
        }
    }

    /// The bucket this store writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn sdk_failure(operation: &str, err: &impl std::error::Error) -> BlobError {
    let err_str = DisplayErrorContext(err).to_string();
    error!(error = %err_str, "S3 {operation} failed");
    classify_sdk_error(&err_str).into()
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list_all(&self) -> Result<Vec<String>, BlobError> {
        let mut names = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| sdk_failure("list_objects_v2", &e))?;

            names.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_owned)),
            );

            match page.next_continuation_token() {
                Some(token) => continuation = Some(token.to_owned()),
                None => break,
            }
        }

        debug!(count = names.len(), "listed S3 objects");
        Ok(names)
    }

    #[instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .set_content_type(content_type.map(str::to_owned))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| sdk_failure("put_object", &e))?;

        info!(key = %name, "S3 object uploaded");
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn get(&self, name: &str) -> Result<StoredObject, BlobError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(GetObjectError::is_no_such_key)
                {
                    BlobError::NotFound(name.to_owned())
                } else {
                    sdk_failure("get_object", &e)
                }
            })?;

        let content_type = result.content_type().map(str::to_owned);
        let data = result
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Storage(format!("failed to read S3 body: {e}")))?
            .into_bytes();

        debug!(key = %name, size = data.len(), "S3 object downloaded");
        Ok(StoredObject { data, content_type })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| sdk_failure("delete_object", &e))?;

        info!(key = %name, "S3 object deleted");
        Ok(())
    }
}
