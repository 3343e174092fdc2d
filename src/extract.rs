//! PDF text extraction.
//!
//! Parsing is CPU-bound, so it runs on the blocking pool. A parser panic surfaces as
//! [`ExtractionError::Task`] instead of taking the request down.

use crate::processing::ExtractionError;

/// Extract the text layer of a PDF held in memory.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|error| ExtractionError::Task(error.to_string()))?
        .map_err(|error| ExtractionError::Pdf(error.to_string()))?;

    tracing::debug!(bytes = size, characters = text.chars().count(), "Extracted PDF text");
    Ok(text)
}

/// Whether the payload starts with the PDF magic bytes.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}
