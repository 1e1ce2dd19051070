use serde::{Deserialize, Serialize};

/// Connection settings shared by the S3, SQS and `DynamoDB` clients.
///
/// Loaded from the `[aws]` section of the server configuration. Credentials
/// come from the standard AWS environment chain; `role_arn` optionally layers
/// an STS assume-role on top of them.
#[derive(Clone, Serialize, Deserialize)]
pub struct AwsBaseConfig {
    /// AWS region (e.g. `"us-west-2"`).
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint URL override for local development (e.g. `LocalStack`).
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// IAM role ARN to assume via STS.
    #[serde(default)]
    pub role_arn: Option<String>,

    /// STS session name (defaults to `"filedesk"`).
    #[serde(default)]
    pub session_name: Option<String>,

    /// External ID for cross-account trust policies.
    #[serde(default)]
    pub external_id: Option<String>,
}

impl std::fmt::Debug for AwsBaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsBaseConfig")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("role_arn", &self.role_arn.as_ref().map(|_| "[REDACTED]"))
            .field("session_name", &self.session_name)
            .field("external_id", &self.external_id.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AwsBaseConfig {
    /// Create a config for the given region with no overrides.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
            role_arn: None,
            session_name: None,
            external_id: None,
        }
    }

    /// Point every client at a custom endpoint.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Assume the given IAM role via STS.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Set the STS session name used when assuming a role.
    #[must_use]
    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = Some(session_name.into());
        self
    }

    /// Set the external ID used when assuming a role.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

impl Default for AwsBaseConfig {
    fn default() -> Self {
        Self::new(default_region())
    }
}

fn default_region() -> String {
    "us-east-1".to_owned()
}
