//! HTTP routes, handlers and shared state.

pub mod files;
pub mod form;
pub mod health;
pub mod logs;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use filedesk_core::{AuditLog, BlobStore, MessageQueue};

use crate::config::FiledeskConfig;
use crate::error::ServerError;
use crate::views::Views;

/// Request-independent settings the handlers read.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Names starting with this prefix are hidden from listings.
    pub reserved_prefix: String,
    /// Fallback content type for `/getfile`.
    pub default_content_type: String,
    /// `App` attribute of audit records.
    pub app_name: String,
    /// Maximum records shown on `/logs`.
    pub log_limit: u32,
    /// Whether a failed audit write fails the request.
    pub strict_audit: bool,
    /// Maximum request body size.
    pub max_upload_bytes: usize,
}

impl HandlerSettings {
    pub fn from_config(config: &FiledeskConfig) -> Self {
        Self {
            reserved_prefix: config.blob.reserved_prefix.clone(),
            default_content_type: config.blob.default_content_type.clone(),
            app_name: config.audit.app_name.clone(),
            log_limit: config.audit.log_limit,
            strict_audit: config.audit.strict,
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self::from_config(&FiledeskConfig::default())
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Uploaded files.
    pub blobs: Arc<dyn BlobStore>,
    /// Queue receiving one message per file to process.
    pub queue: Arc<dyn MessageQueue>,
    /// Activity log.
    pub audit: Arc<dyn AuditLog>,
    /// Page templates.
    pub views: Arc<Views>,
    /// Handler settings.
    pub settings: Arc<HandlerSettings>,
}

impl AppState {
    /// Append an audit record under the configured app name.
    ///
    /// Failures are logged and swallowed unless strict auditing is enabled.
    pub async fn record_audit(&self, kind: &str, content: &str) -> Result<(), ServerError> {
        match self
            .audit
            .append(&self.settings.app_name, kind, content)
            .await
        {
            Ok(record) => {
                debug!(item_name = %record.item_name, kind, "audit record written");
                Ok(())
            }
            Err(e) if self.settings.strict_audit => Err(e.into()),
            Err(e) => {
                warn!(error = %e, kind, "audit write failed, continuing");
                Ok(())
            }
        }
    }
}

/// Build the Axum router with every page route and the tracing layer.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;

    Router::new()
        .route("/", get(pages::index))
        .route("/upload", get(pages::upload_form).post(files::upload))
        .route("/process", get(files::list).post(files::process))
        .route("/delete", post(files::delete))
        .route("/getfile/{name}", get(files::get_file))
        .route("/logs", get(logs::logs))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
