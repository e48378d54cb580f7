//! Resume text extraction from uploaded PDF bytes.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts plain text from a PDF on the blocking pool.
/// `pdf-extract` is CPU-bound and can panic on malformed input; a panic surfaces as `Task`.
pub async fn extract_pdf_text(pdf: Bytes) -> Result<String, ExtractionError> {
    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    debug!(bytes = size, chars = text.len(), "Extracted resume text");
    Ok(text)
}
