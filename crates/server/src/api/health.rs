use axum::Json;
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /health` -- liveness probe. Does not touch the backends.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
