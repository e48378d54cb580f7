//! Axum route handler for the Match API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::MatchResult;
use crate::errors::AppError;
use crate::extraction::extract_pdf_text;
use crate::state::AppState;

/// Resume text used when the form carries no resume file.
pub const NO_RESUME_TEXT: &str = "No resume provided (Mock Mode)";
/// Resume text used when the PDF yields no extractable text.
pub const EMPTY_PDF_TEXT: &str = "Empty PDF content";

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// POST /api/match
///
/// Multipart form: optional `resume` PDF file, optional `jobDescription` text.
/// Returns the normalized `MatchResult` from whichever provider the configuration selects.
pub async fn handle_match(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let mut resume_text = NO_RESUME_TEXT.to_string();
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(malformed_form)?;
                if data.is_empty() {
                    continue;
                }
                if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
                    return Err(AppError::Validation(
                        "Only PDF files are accepted".to_string(),
                    ));
                }
                if data.len() > state.config.max_upload_bytes {
                    return Err(AppError::Validation(format!(
                        "File size must be less than {}",
                        format_size_limit(state.config.max_upload_bytes)
                    )));
                }

                let text = extract_pdf_text(data).await?;
                resume_text = if text.trim().is_empty() {
                    EMPTY_PDF_TEXT.to_string()
                } else {
                    text
                };
            }
            Some("jobDescription") => {
                job_description = field.text().await.map_err(malformed_form)?;
            }
            _ => {}
        }
    }

    let result = state
        .dispatcher
        .analyze_match(&resume_text, job_description.trim())
        .await?;

    Ok(Json(result))
}

/// Renders a byte limit in the largest unit that divides it exactly.
fn format_size_limit(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

fn malformed_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed form data: {e}"))
}
