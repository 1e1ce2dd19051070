use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use filedesk_core::{AuditError, AuditLog, AuditRecord, BlobStore};
use filedesk_memory::{MemoryAuditLog, MemoryBlobStore, MemoryQueue};
use filedesk_server::api::{AppState, HandlerSettings, router};
use filedesk_server::views::Views;

// -- Failing audit log ----------------------------------------------------

struct FailingAuditLog;

#[async_trait]
impl AuditLog for FailingAuditLog {
    async fn record(&self, _entry: AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Storage("table unavailable".into()))
    }

    async fn query_recent(&self, _limit: u32) -> Result<Vec<AuditRecord>, AuditError> {
        Err(AuditError::Storage("table unavailable".into()))
    }
}

// -- Helpers --------------------------------------------------------------

struct Harness {
    blobs: Arc<MemoryBlobStore>,
    queue: Arc<MemoryQueue>,
    audit: Arc<MemoryAuditLog>,
    state: AppState,
}

impl Harness {
    fn new() -> Self {
        Self::with_settings(HandlerSettings::default())
    }

    fn with_settings(settings: HandlerSettings) -> Self {
        let blobs = Arc::new(MemoryBlobStore::new());
        let queue = Arc::new(MemoryQueue::new());
        let audit = Arc::new(MemoryAuditLog::new());
        let state = AppState {
            blobs: blobs.clone(),
            queue: queue.clone(),
            audit: audit.clone(),
            views: Arc::new(Views::new().expect("templates should load")),
            settings: Arc::new(settings),
        };
        Self {
            blobs,
            queue,
            audit,
            state,
        }
    }

    /// Swap the audit log for one that always fails.
    fn with_failing_audit(mut self, strict: bool) -> Self {
        let settings = HandlerSettings {
            strict_audit: strict,
            ..HandlerSettings::default()
        };
        self.state.audit = Arc::new(FailingAuditLog);
        self.state.settings = Arc::new(settings);
        self
    }

    async fn send(&self, request: Request<Body>) -> Response {
        router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method(http::Method::POST)
                .uri(uri)
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, field: &str, filename: &str, content_type: &str, data: &[u8]) -> Response {
        const BOUNDARY: &str = "filedesk-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::builder()
                .method(http::Method::POST)
                .uri("/upload")
                .header(
                    http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    async fn put(&self, name: &str, data: &'static [u8], content_type: Option<&str>) {
        self.blobs
            .put(name, Bytes::from_static(data), content_type)
            .await
            .unwrap();
    }
}

async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// -- Pages ----------------------------------------------------------------

#[tokio::test]
async fn index_and_upload_form_render() {
    let h = Harness::new();

    let response = h.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    assert!(body_text(response).await.contains("href=\"/upload\""));

    let response = h.get("/upload").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("enctype=\"multipart/form-data\""));
    assert!(page.contains("name=\"file\""));
}

#[tokio::test]
async fn health_returns_ok_json() {
    let h = Harness::new();
    let response = h.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let h = Harness::new();
    let response = h.get("/delete").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// -- Upload ---------------------------------------------------------------

#[tokio::test]
async fn upload_sanitizes_name_and_lists_it() {
    let h = Harness::new();

    let response = h.upload("file", "a b.txt", "text/plain", b"hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Uploaded"));
    assert!(page.contains("a_b.txt"));

    assert_eq!(h.blobs.list_all().await.unwrap(), vec!["a_b.txt"]);

    let response = h.get("/process").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"value="a_b.txt""#));
    assert!(page.contains(r#"href="/getfile/a_b.txt""#));
}

#[tokio::test]
async fn upload_strips_path_components() {
    let h = Harness::new();
    let response = h
        .upload("file", "../../etc/passwd", "text/plain", b"root")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.blobs.list_all().await.unwrap(), vec!["etc_passwd"]);
}

#[tokio::test]
async fn upload_then_fetch_is_byte_identical() {
    let h = Harness::new();
    let data: Vec<u8> = (0u8..=255).chain([0, 13, 10, 255]).collect();

    let response = h
        .upload("file", "blob.bin", "application/x-custom", &data)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = h.get("/getfile/blob.bin").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/x-custom");
    assert_eq!(body_bytes(response).await.as_ref(), data.as_slice());
}

#[tokio::test]
async fn upload_keeps_base_letters_of_accented_names() {
    let h = Harness::new();
    let response = h.upload("file", "café.jpg", "image/jpeg", b"jpeg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.blobs.list_all().await.unwrap(), vec!["cafe.jpg"]);
}

#[tokio::test]
async fn upload_with_unusable_name_is_bad_request() {
    let h = Harness::new();
    let response = h.upload("file", "///", "text/plain", b"x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let h = Harness::new();
    let response = h.upload("attachment", "a.txt", "text/plain", b"x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn upload_over_limit_is_rejected() {
    let h = Harness::with_settings(HandlerSettings {
        max_upload_bytes: 64,
        ..HandlerSettings::default()
    });
    let response = h.upload("file", "big.bin", "text/plain", &[b'x'; 1024]).await;
    assert!(response.status().is_client_error());
    assert!(h.blobs.is_empty());
}

// -- Listing & delete -----------------------------------------------------

#[tokio::test]
async fn listing_hides_reserved_prefix() {
    let h = Harness::new();
    h.put("logs/2024-01-01.txt", b"internal", None).await;
    h.put("logsheet.csv", b"internal", None).await;
    h.put("report.pdf", b"visible", None).await;

    let page = body_text(h.get("/process").await).await;
    assert!(page.contains(r#"value="report.pdf""#));
    assert!(!page.contains("logs/2024-01-01.txt"));
    assert!(!page.contains("logsheet.csv"));
}

#[tokio::test]
async fn empty_listing_renders() {
    let h = Harness::new();
    let response = h.get("/process").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No files"));
}

#[tokio::test]
async fn delete_removes_selected_files() {
    let h = Harness::new();
    h.put("a.txt", b"a", None).await;
    h.put("b.txt", b"b", None).await;
    h.put("c.txt", b"c", None).await;

    let response = h.post_form("/delete", "file=a.txt&file=c.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Deleted 2 file(s)"));

    assert_eq!(h.blobs.list_all().await.unwrap(), vec!["b.txt"]);
    let page = body_text(h.get("/process").await).await;
    assert!(!page.contains(r#"value="a.txt""#));
    assert!(page.contains(r#"value="b.txt""#));
}

#[tokio::test]
async fn delete_missing_file_succeeds() {
    let h = Harness::new();
    let response = h.post_form("/delete", "file=ghost.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Process --------------------------------------------------------------

#[tokio::test]
async fn process_sends_one_message_per_file_and_one_audit_record() {
    let h = Harness::new();

    let response = h.post_form("/process", "file=a.txt&file=b.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Processing"));

    assert_eq!(h.queue.messages(), vec!["a.txt", "b.txt"]);

    let records = h.audit.query_recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].app, "webapp");
    assert_eq!(records[0].kind, "Files to process");
    assert_eq!(records[0].content, r#"["a.txt","b.txt"]"#);
}

#[tokio::test]
async fn audit_failure_is_swallowed_by_default() {
    let h = Harness::new().with_failing_audit(false);

    let response = h.post_form("/process", "file=a.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.queue.messages(), vec!["a.txt"]);
}

#[tokio::test]
async fn strict_audit_failure_fails_the_request() {
    let h = Harness::new().with_failing_audit(true);

    let response = h.post_form("/process", "file=a.txt").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.queue.messages().is_empty());

    h.put("a.txt", b"a", None).await;
    let response = h.get("/getfile/a.txt").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// -- Get file -------------------------------------------------------------

#[tokio::test]
async fn get_file_records_audit_entry() {
    let h = Harness::new();
    h.put("a.txt", b"hello", Some("text/plain")).await;

    let response = h.get("/getfile/a.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.as_ref(), b"hello");

    let records = h.audit.query_recent(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, "Get file");
    assert_eq!(records[0].content, "a.txt");
}

#[tokio::test]
async fn get_missing_file_is_not_found() {
    let h = Harness::new();
    let response = h.get("/getfile/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("missing.txt"));
}

#[tokio::test]
async fn get_file_content_type_fallbacks() {
    let h = Harness::new();
    h.put("photo.png", b"png", None).await;
    h.put("scan", b"raw", None).await;
    h.put("notes.txt", b"txt", Some("application/octet-stream"))
        .await;

    assert_eq!(content_type(&h.get("/getfile/photo.png").await), "image/png");
    assert_eq!(content_type(&h.get("/getfile/scan").await), "image/jpeg");
    assert_eq!(content_type(&h.get("/getfile/notes.txt").await), "text/plain");
}

#[tokio::test]
async fn get_file_uses_configured_default_type() {
    let h = Harness::with_settings(HandlerSettings {
        default_content_type: "application/pdf".into(),
        ..HandlerSettings::default()
    });
    h.put("scan", b"raw", None).await;
    assert_eq!(
        content_type(&h.get("/getfile/scan").await),
        "application/pdf"
    );
}

#[tokio::test]
async fn uploaded_html_is_served_as_download() {
    let h = Harness::new();
    let page = b"<script>alert(document.cookie)</script>";
    let response = h.upload("file", "evil.html", "text/html", page).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = h.get("/getfile/evil.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[http::header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(
        headers[http::header::CONTENT_DISPOSITION],
        "attachment; filename=\"evil.html\""
    );
    assert_eq!(body_bytes(response).await.as_ref(), page);
}

#[tokio::test]
async fn svg_is_served_as_download() {
    let h = Harness::new();
    h.put("logo.svg", b"<svg/>", Some("image/svg+xml")).await;

    let response = h.get("/getfile/logo.svg").await;
    assert!(
        response
            .headers()
            .contains_key(http::header::CONTENT_DISPOSITION)
    );
}

#[tokio::test]
async fn images_are_served_inline_with_nosniff() {
    let h = Harness::new();
    h.put("photo.png", b"png", Some("image/png")).await;
    h.put("scan", b"raw", None).await;

    for uri in ["/getfile/photo.png", "/getfile/scan"] {
        let response = h.get(uri).await;
        assert_eq!(response.headers()[http::header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(
            !response
                .headers()
                .contains_key(http::header::CONTENT_DISPOSITION)
        );
    }
}

// -- Logs -----------------------------------------------------------------

#[tokio::test]
async fn logs_are_newest_first_and_limited() {
    let h = Harness::with_settings(HandlerSettings {
        log_limit: 3,
        ..HandlerSettings::default()
    });
    for second in 0..5 {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap();
        h.audit
            .record(AuditRecord::at(at, "webapp", "Get file", format!("file-{second}")))
            .await
            .unwrap();
    }

    let response = h.get("/logs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<title>Log</title>"));

    let positions: Vec<usize> = ["file-4", "file-3", "file-2"]
        .iter()
        .map(|content| page.find(content).expect("record should be shown"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!page.contains("file-1"));
    assert!(!page.contains("file-0"));
}

#[tokio::test]
async fn logs_fail_when_audit_log_is_unreadable() {
    let h = Harness::new().with_failing_audit(false);
    let response = h.get("/logs").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn startup_record_is_written() {
    let h = Harness::new();
    h.state
        .record_audit("Starting", "Started webapp")
        .await
        .unwrap();

    let page = body_text(h.get("/logs").await).await;
    assert!(page.contains("Starting"));
    assert!(page.contains("Started webapp"));
}
