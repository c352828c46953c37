use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{KeywordSet, KeywordSummary, LogDocument};
use crate::render::ResultFormatter;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

/// Process start time, forced in main so health uptime is process uptime.
pub static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Upload form page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: STARTED_AT.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Default, Validate)]
struct ProcessRequest {
    #[validate(length(max = 1024, message = "keywords string too long"))]
    keywords: String,
    annotate: Option<bool>,
}

/// Filter an uploaded log against a keyword set
///
/// Multipart fields: `logFile` (required file), `keywords` (string, comma or
/// plus separated), `annotate` (optional boolean override).
pub async fn process_log(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let mut log_bytes: Option<axum::body::Bytes> = None;
    let mut request = ProcessRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("logFile") => {
                log_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Upload(format!("Failed to read uploaded file: {e}"))
                })?);
            }
            Some("keywords") => {
                request.keywords = field.text().await.map_err(|e| {
                    AppError::Upload(format!("Failed to read keywords field: {e}"))
                })?;
            }
            Some("annotate") => {
                let value = field.text().await.map_err(|e| {
                    AppError::Upload(format!("Failed to read annotate field: {e}"))
                })?;
                request.annotate = Some(matches!(value.trim(), "true" | "on" | "1"));
            }
            _ => {}
        }
    }

    let log_bytes =
        log_bytes.ok_or_else(|| AppError::Upload("Missing logFile field".to_string()))?;
    request.validate()?;

    crate::metrics::UPLOAD_BYTES.observe(log_bytes.len() as f64);

    // Spooled file is removed when this guard drops, on every exit path.
    let spooled = state.spool.store(&log_bytes).await?;
    let text = spooled.read_to_string().await?;

    let document = LogDocument::from_text(&text);
    let keywords = KeywordSet::parse(&request.keywords);

    tracing::info!(
        upload_bytes = log_bytes.len(),
        document_lines = document.len(),
        keywords = keywords.len(),
        "Processing uploaded log"
    );

    let report = state.engine.filter(&document, &keywords).await;

    let annotate = request.annotate.unwrap_or(state.annotate_by_default);
    let lines = if annotate {
        state.annotator.annotate(&report.lines)
    } else {
        report.lines.clone()
    };

    let output = ResultFormatter::render(&lines);

    Ok(Json(ProcessResponse {
        output,
        line_count: report.lines.len(),
        annotated: annotate,
        keywords: report.keywords,
        processed_at: chrono::Utc::now(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Display markup wrapping the filtered (and optionally annotated) lines
    pub output: String,
    pub line_count: usize,
    pub annotated: bool,
    pub keywords: Vec<KeywordSummary>,
    pub processed_at: chrono::DateTime<chrono::Utc>,
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> (StatusCode, String) {
    let metrics = crate::metrics::gather_metrics();
    (StatusCode::OK, metrics)
}
