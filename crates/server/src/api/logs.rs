use axum::extract::State;
use axum::response::Html;
use minijinja::context;
use tracing::debug;

use super::AppState;
use crate::error::ServerError;

/// `GET /logs` -- most recent audit records, newest first.
pub async fn logs(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let items = state.audit.query_recent(state.settings.log_limit).await?;
    debug!(count = items.len(), "loaded audit records");
    Ok(state
        .views
        .render("log.html", context! { title => "Log", items })?)
}
