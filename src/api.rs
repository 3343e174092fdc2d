//! HTTP surface for the study guide generator.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /api/generate` – Multipart upload with a `pdfFile` part (`application/pdf`) and a
//!   `selectedTypes` part holding `{"selectedTypes": [...]}`. Extracts the PDF text, generates the
//!   guide, and returns it as JSON.
//! - `POST /api/generate/text` – Same pipeline for text that was already extracted.
//! - `GET /api/download/:id` – Rendered plain-text guide served as an attachment.
//! - `GET /metrics` – Generation counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Failures are returned as `{"message": ...}` with 400 for bad input and 500 when generation
//! itself failed.

use crate::extract::{extract_pdf_text, looks_like_pdf};
use crate::metrics::MetricsSnapshot;
use crate::processing::{
    ExtractionError, GuideRequest, ProcessingError, QuestionError, StudyGuide, StudyGuideApi,
    SummaryError, sanitize::sanitize_filename,
};
use crate::render::{download_filename, render_text};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Extension, Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const PDF_FIELD: &str = "pdfFile";
const TYPES_FIELD: &str = "selectedTypes";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Build the HTTP router exposing the study guide API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: StudyGuideApi + 'static,
{
    Router::new()
        .route(
            "/api/generate",
            post(generate_from_upload::<S>)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(max_upload_bytes))
                .layer::<_, std::convert::Infallible>(Extension(UploadLimit(max_upload_bytes))),
        )
        .route("/api/generate/text", post(generate_from_text::<S>))
        .route("/api/download/:id", get(download_guide::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Largest accepted upload, in bytes.
#[derive(Clone, Copy)]
struct UploadLimit(usize);

/// Accepted encodings of the `selectedTypes` multipart part.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectedTypesField {
    Wrapped {
        #[serde(rename = "selectedTypes")]
        selected_types: Vec<String>,
    },
    Bare(Vec<String>),
}

impl SelectedTypesField {
    fn into_types(self) -> Vec<String> {
        match self {
            SelectedTypesField::Wrapped { selected_types } => selected_types,
            SelectedTypesField::Bare(selected_types) => selected_types,
        }
    }
}

/// Generate a study guide from an uploaded PDF.
async fn generate_from_upload<S>(
    State(service): State<Arc<S>>,
    Extension(limit): Extension<UploadLimit>,
    mut multipart: Multipart,
) -> Result<Json<StudyGuide>, AppError>
where
    S: StudyGuideApi,
{
    let multipart_error = |error: MultipartError| upload_error(error, limit);
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut selected_types: Vec<String> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(PDF_FIELD) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if content_type != PDF_CONTENT_TYPE {
                    return Err(AppError::bad_request("Only PDF files are allowed"));
                }
                let filename = sanitize_filename(field.file_name().map(str::to_string));
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((filename, bytes.to_vec()));
            }
            Some(TYPES_FIELD) => {
                let raw = field.text().await.map_err(multipart_error)?;
                let parsed: SelectedTypesField = serde_json::from_str(&raw).map_err(|_| {
                    AppError::bad_request("selectedTypes must be a JSON list of question types")
                })?;
                selected_types = parsed.into_types();
            }
            _ => {
                tracing::debug!(field = ?name, "Ignoring unexpected multipart field");
            }
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| AppError::bad_request("No file uploaded"))?;
    if selected_types.iter().all(|kind| kind.trim().is_empty()) {
        return Err(ProcessingError::NoQuestionTypes.into());
    }
    if !looks_like_pdf(&bytes) {
        return Err(AppError::bad_request("Uploaded file is not a valid PDF"));
    }

    tracing::info!(filename = %filename, bytes = bytes.len(), "Received PDF upload");
    let text = extract_pdf_text(bytes)
        .await
        .map_err(ProcessingError::from)?;
    let guide = service
        .generate(GuideRequest {
            filename,
            text,
            selected_types,
        })
        .await?;
    Ok(Json(guide))
}

/// Request body for `POST /api/generate/text`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTextRequest {
    /// Optional display name of the source document.
    #[serde(default)]
    filename: Option<String>,
    /// Extracted document text.
    text: String,
    /// Requested question type identifiers.
    #[serde(default)]
    selected_types: Vec<String>,
}

/// Generate a study guide from pre-extracted text.
async fn generate_from_text<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<GenerateTextRequest>,
) -> Result<Json<StudyGuide>, AppError>
where
    S: StudyGuideApi,
{
    let GenerateTextRequest {
        filename,
        text,
        selected_types,
    } = request;
    let guide = service
        .generate(GuideRequest {
            filename: sanitize_filename(filename),
            text,
            selected_types,
        })
        .await?;
    Ok(Json(guide))
}

/// Serve a stored guide as a plain-text attachment.
async fn download_guide<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError>
where
    S: StudyGuideApi,
{
    let guide = service
        .get_guide(id)
        .await
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Study guide not found"))?;
    tracing::info!(id, "Serving study guide download");

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_filename(id)),
        ),
        (
            header::CACHE_CONTROL,
            "no-cache, no-store, must-revalidate".to_string(),
        ),
        (header::PRAGMA, "no-cache".to_string()),
        (header::EXPIRES, "0".to_string()),
    ];
    Ok((headers, render_text(&guide)).into_response())
}

/// Return the generation counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: StudyGuideApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "generate",
                method: "POST",
                path: "/api/generate",
                description: "Upload a PDF (multipart part `pdfFile`) with a `selectedTypes` part and receive a summary plus question sections.",
                request_example: Some(json!({
                    "selectedTypes": ["theoretical", "mcq", "truefalse"]
                })),
            },
            CommandDescriptor {
                name: "generate_text",
                method: "POST",
                path: "/api/generate/text",
                description: "Generate a study guide from already extracted document text.",
                request_example: Some(json!({
                    "filename": "lecture-notes.pdf",
                    "text": "Document contents",
                    "selectedTypes": ["application", "fillblanks"]
                })),
            },
            CommandDescriptor {
                name: "download",
                method: "GET",
                path: "/api/download/:id",
                description: "Download a generated study guide as a plain-text document.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return generation counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Processing(ProcessingError),
    Request { status: StatusCode, message: String },
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

fn upload_error(error: MultipartError, limit: UploadLimit) -> AppError {
    let status = error.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(
            status,
            format!(
                "File too large. Please upload a PDF smaller than {}.",
                format_size(limit.0)
            ),
        );
    }
    AppError::new(status, format!("Invalid upload: {}", error.body_text()))
}

/// Human-readable byte count using binary units.
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Map a pipeline failure to the status code and client-facing message.
fn describe(error: &ProcessingError) -> (StatusCode, String) {
    match error {
        ProcessingError::NoQuestionTypes => (
            StatusCode::BAD_REQUEST,
            "Please select at least one question type".into(),
        ),
        ProcessingError::Question(QuestionError::UnsupportedType(_)) => {
            (StatusCode::BAD_REQUEST, error.to_string())
        }
        ProcessingError::Summary(SummaryError::InsufficientText { length, minimum }) => (
            StatusCode::BAD_REQUEST,
            format!(
                "The document has insufficient extractable text ({length} characters, need at least {minimum})"
            ),
        ),
        ProcessingError::Extraction(ExtractionError::Pdf(_)) => (
            StatusCode::BAD_REQUEST,
            "Could not extract text from the uploaded PDF".into(),
        ),
        ProcessingError::Summary(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate a summary. Please try again.".into(),
        ),
        ProcessingError::Question(_) | ProcessingError::Extraction(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate the study guide. Please try again.".into(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Processing(error) => {
                let (status, message) = describe(&error);
                if status.is_server_error() {
                    tracing::error!(%error, "Study guide request failed");
                } else {
                    tracing::warn!(%error, "Rejected study guide request");
                }
                (status, message)
            }
            AppError::Request { status, message } => {
                tracing::warn!(%status, message = %message, "Rejected request");
                (status, message)
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}
