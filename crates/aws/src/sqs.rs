use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use filedesk_core::{MessageQueue, QueueError};

use crate::error::classify_sdk_error;

/// Queue settings for [`SqsQueue`].
///
/// Either `queue_url` or `queue_name` must be set. A URL wins; a name is
/// resolved to a URL once when the queue is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqsConfig {
    /// Full queue URL.
    #[serde(default)]
    pub queue_url: Option<String>,

    /// Queue name, resolved through `GetQueueUrl`.
    #[serde(default)]
    pub queue_name: Option<String>,
}

impl SqsConfig {
    /// Address the queue by URL.
    pub fn from_url(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: Some(queue_url.into()),
            queue_name: None,
        }
    }

    /// Address the queue by name.
    pub fn from_name(queue_name: impl Into<String>) -> Self {
        Self {
            queue_url: None,
            queue_name: Some(queue_name.into()),
        }
    }
}

/// [`MessageQueue`] backed by a single SQS queue.
pub struct SqsQueue {
    queue_url: String,
    client: aws_sdk_sqs::Client,
}

impl std::fmt::Debug for SqsQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqsQueue")
            .field("queue_url", &self.queue_url)
            .field("client", &"<SqsClient>")
            .finish()
    }
}

impl SqsQueue {
    /// Build an SQS client and resolve the queue URL.
    pub async fn new(
        sdk_config: &aws_config::SdkConfig,
        config: &SqsConfig,
    ) -> Result<Self, QueueError> {
        let client = aws_sdk_sqs::Client::new(sdk_config);
        let queue_url = resolve_queue_url(&client, config).await?;
        info!(queue_url = %queue_url, "SQS queue resolved");
        Ok(Self::with_client(client, queue_url))
    }

    /// Create a queue around a pre-built client and a known URL.
    pub fn with_client(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            client,
        }
    }

    /// The URL messages are sent to.
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

async fn resolve_queue_url(
    client: &aws_sdk_sqs::Client,
    config: &SqsConfig,
) -> Result<String, QueueError> {
    if let Some(url) = &config.queue_url {
        return Ok(url.clone());
    }

    let name = config.queue_name.as_deref().ok_or_else(|| {
        QueueError::Configuration("either queue_url or queue_name must be set".to_owned())
    })?;

    debug!(queue_name = %name, "resolving SQS queue URL");
    let output = client
        .get_queue_url()
        .queue_name(name)
        .send()
        .await
        .map_err(|e| {
            let err_str = DisplayErrorContext(&e).to_string();
            error!(error = %err_str, queue_name = %name, "SQS get_queue_url failed");
            QueueError::Configuration(format!("cannot resolve queue '{name}': {err_str}"))
        })?;

    output
        .queue_url()
        .map(str::to_owned)
        .ok_or_else(|| QueueError::Configuration(format!("queue '{name}' returned no URL")))
}

#[async_trait]
impl MessageQueue for SqsQueue {
    #[instrument(skip(self), fields(queue_url = %self.queue_url))]
    async fn send(&self, body: &str) -> Result<String, QueueError> {
        let result = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, "SQS send_message failed");
                QueueError::from(classify_sdk_error(&err_str))
            })?;

        let message_id = result.message_id().unwrap_or("unknown").to_owned();
        info!(message_id = %message_id, "SQS message sent");
        Ok(message_id)
    }
}
