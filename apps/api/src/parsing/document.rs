use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("document contains no text")]
    Empty,
}

/// Extracts plain text from an uploaded resume. `.pdf` files go through the
/// PDF text extractor; anything else is read as UTF-8, replacing invalid
/// sequences.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, DocumentError> {
    let text = if filename.to_lowercase().ends_with(".pdf") {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    info!(filename, chars = text.chars().count(), "extracted document text");
    Ok(text)
}
