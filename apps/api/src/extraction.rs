//! Document → plain text.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error reading PDF: {0}")]
    Unreadable(String),

    #[error("Could not extract text from the PDF.")]
    Empty,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// Extracts text from every page of a PDF with `pdf-extract`.
///
/// Parsing runs on the blocking pool; a panic inside the parser (it has a few
/// on malformed input) surfaces as `Unreadable` instead of killing the worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        let size = document.len();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document)
        })
        .await
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?
        .map_err(|e| ExtractionError::Unreadable(format!("{e:?}")))?;

        debug!(bytes = size, chars = text.len(), "extracted PDF text");
        non_empty(text)
    }
}

/// Rejects documents that yielded only whitespace.
pub fn non_empty(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::Empty)
    } else {
        Ok(text)
    }
}
