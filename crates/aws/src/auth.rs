use tracing::{debug, info};

use crate::config::AwsBaseConfig;

const DEFAULT_SESSION_NAME: &str = "filedesk";

/// Build the one `SdkConfig` the S3, SQS and `DynamoDB` clients share.
///
/// Credentials come from the environment chain. With `role_arn` set, those
/// base credentials only sign the STS call and the clients run under the
/// assumed role.
///
/// ```no_run
/// # async fn localstack() {
/// let base = filedesk_aws::AwsBaseConfig::new("us-east-1")
///     .with_endpoint_url("http://localhost:4566");
/// let shared = filedesk_aws::build_sdk_config(&base).await;
/// let s3 = aws_sdk_s3::Client::new(&shared);
/// # }
/// ```
pub async fn build_sdk_config(config: &AwsBaseConfig) -> aws_config::SdkConfig {
    let base = loader(config).load().await;

    let Some(role_arn) = &config.role_arn else {
        return base;
    };

    let session_name = config
        .session_name
        .as_deref()
        .unwrap_or(DEFAULT_SESSION_NAME);
    info!(role_arn = %role_arn, session_name = %session_name, "assuming IAM role via STS");

    let mut role = aws_config::sts::AssumeRoleProvider::builder(role_arn)
        .session_name(session_name)
        .region(region(config));
    if let Some(external_id) = &config.external_id {
        role = role.external_id(external_id);
    }
    let credentials = role.configure(&base).build().await;

    loader(config)
        .credentials_provider(credentials)
        .load()
        .await
}

fn region(config: &AwsBaseConfig) -> aws_config::Region {
    aws_config::Region::new(config.region.clone())
}

/// Environment loader with the configured region and endpoint override.
fn loader(config: &AwsBaseConfig) -> aws_config::ConfigLoader {
    let loader = aws_config::from_env().region(region(config));
    match &config.endpoint_url {
        Some(endpoint) => {
            debug!(endpoint = %endpoint, "using custom AWS endpoint");
            loader.endpoint_url(endpoint)
        }
        None => loader,
    }
}
