use axum::extract::State;
use axum::response::Html;
use minijinja::context;

use super::AppState;
use crate::error::ServerError;

/// `GET /` -- landing page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    Ok(state.views.render("index.html", context! {})?)
}

/// `GET /upload` -- upload form.
pub async fn upload_form(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    Ok(state
        .views
        .render("file_send.html", context! { title => "Upload" })?)
}
