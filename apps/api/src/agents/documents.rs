//! Text extraction for documents attached to a chat message.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Extracted text beyond this is cut before it reaches the prompt.
const MAX_EXTRACTED_CHARS: usize = 20_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub content_base64: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("attachment is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("text file is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("document contains no text")]
    Empty,
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, file_name: &str, content: Bytes) -> Result<String, DocumentError>;
}

/// PDF via `pdf-extract`; `.txt` and `.md` as UTF-8.
pub struct BasicDocumentExtractor;

impl DocumentExtractor for BasicDocumentExtractor {
    fn extract(&self, file_name: &str, content: Bytes) -> Result<String, DocumentError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        let text = match extension.as_str() {
            "pdf" => pdf_extract::extract_text_from_mem(&content)
                .map_err(|e| DocumentError::Pdf(e.to_string()))?,
            "txt" | "md" => String::from_utf8(content.to_vec())?,
            _ => return Err(DocumentError::UnsupportedType(file_name.to_string())),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(text.chars().take(MAX_EXTRACTED_CHARS).collect())
    }
}

pub fn decode_attachment(attachment: &Attachment) -> Result<Bytes, DocumentError> {
    let raw = STANDARD.decode(attachment.content_base64.trim())?;
    Ok(Bytes::from(raw))
}

/// The user's message with the attachment's text appended, or with an inline
/// notice when the attachment cannot be read.
pub fn augment_message(
    message: &str,
    attachment: &Attachment,
    extractor: &dyn DocumentExtractor,
) -> Result<String, (String, DocumentError)> {
    let name = &attachment.file_name;
    match decode_attachment(attachment).and_then(|bytes| extractor.extract(name, bytes)) {
        Ok(text) => Ok(format!(
            "{message}\n\n---\nATTACHED DOCUMENT ({name}):\n{text}\n---"
        )),
        Err(e) => Err((
            format!("{message}\n\n[Could not read the attached file: {name}]"),
            e,
        )),
    }
}
