use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use tracing::{debug, info};

use filedesk_core::{sanitize_filename, without_reserved};

use super::AppState;
use super::form::SelectedFiles;
use crate::error::ServerError;

/// Content types that say nothing about the payload.
const GENERIC_CONTENT_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

/// `POST /upload` -- store the multipart field `file` under its sanitized name.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_owned();
        let name = sanitize_filename(&original).ok_or_else(|| {
            ServerError::BadRequest(format!("unusable file name: {original:?}"))
        })?;
        let content_type = field.content_type().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        debug!(name = %name, size = data.len(), "storing upload");
        state.blobs.put(&name, data, content_type.as_deref()).await?;
        info!(name = %name, "file uploaded");

        return Ok(state.views.message("Uploaded", &format!("Saved {name}"))?);
    }

    Err(ServerError::BadRequest("missing multipart field `file`".into()))
}

/// `GET /process` -- selectable list of stored files.
pub async fn list(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let names = state.blobs.list_all().await?;
    let files = without_reserved(names, &state.settings.reserved_prefix);
    Ok(state
        .views
        .render("files.html", context! { title => "Files", files })?)
}

/// `POST /process` -- log the selection once, then enqueue one message per file.
pub async fn process(
    State(state): State<AppState>,
    SelectedFiles(files): SelectedFiles,
) -> Result<Html<String>, ServerError> {
    let listing = serde_json::json!(&files).to_string();
    state.record_audit("Files to process", &listing).await?;

    for name in &files {
        let message_id = state.queue.send(name).await?;
        debug!(name = %name, message_id = %message_id, "queued file");
    }
    info!(count = files.len(), "files queued for processing");

    Ok(state.views.message(
        "Processing",
        &format!("Queued {} file(s) for processing", files.len()),
    )?)
}

/// `POST /delete` -- remove every selected file.
pub async fn delete(
    State(state): State<AppState>,
    SelectedFiles(files): SelectedFiles,
) -> Result<Html<String>, ServerError> {
    for name in &files {
        state.blobs.delete(name).await?;
        debug!(name = %name, "file deleted");
    }
    info!(count = files.len(), "files deleted");

    Ok(state
        .views
        .message("Deleted", &format!("Deleted {} file(s)", files.len()))?)
}

/// `GET /getfile/{name}` -- raw file content.
pub async fn get_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServerError> {
    state.record_audit("Get file", &name).await?;

    let object = state.blobs.get(&name).await?;
    let content_type = resolve_content_type(
        object.content_type.as_deref(),
        &name,
        &state.settings.default_content_type,
    );

    let inline = is_inline_safe(&content_type);
    let mut response = ([(header::CONTENT_TYPE, content_type)], object.data).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if !inline {
        headers.insert(header::CONTENT_DISPOSITION, attachment(&name));
    }
    Ok(response)
}

/// Whether a browser may render `content_type` inline on our origin.
///
/// Scriptable types (HTML, SVG, XML, JavaScript) and unknown types are
/// served as downloads instead.
pub fn is_inline_safe(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("image", subtype)) => !subtype.starts_with("svg"),
        _ => matches!(essence.as_str(), "text/plain" | "application/pdf"),
    }
}

fn attachment(name: &str) -> HeaderValue {
    sanitize_filename(name)
        .and_then(|safe| HeaderValue::from_str(&format!("attachment; filename=\"{safe}\"")).ok())
        .unwrap_or_else(|| HeaderValue::from_static("attachment"))
}

/// Pick the content type served for `name`.
///
/// The type stored with the object wins unless it is missing or generic; then
/// the extension is consulted, and finally `default`.
pub fn resolve_content_type(stored: Option<&str>, name: &str, default: &str) -> String {
    if let Some(stored) = stored.map(str::trim).filter(|s| !s.is_empty())
        && !GENERIC_CONTENT_TYPES.contains(&stored)
    {
        return stored.to_owned();
    }
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(default)
        .to_owned()
}
