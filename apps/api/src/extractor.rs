use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    UnreadableDocument(String),
}

/// Turns uploaded document bytes into plain text.
///
/// Implementations are synchronous and CPU-bound; callers run them on the blocking pool.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// PDF text extraction via `pdf-extract`. Pages are concatenated in order.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::UnreadableDocument(e.to_string()))
    }
}
