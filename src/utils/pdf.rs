//! PDF text extraction utilities.
//!
//! Pages are read with `lopdf`, one page at a time and in page order. When no
//! page yields text through `lopdf`, the whole buffer is handed to
//! `pdf-extract` as a fallback.

use lopdf::{Dictionary, Document, Object};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("File is not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("Encrypted PDF documents are not supported")]
    Encrypted,

    #[error("PDF has no pages")]
    NoPages,

    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),
}

/// Text and metadata pulled out of a PDF
#[derive(Debug, Clone, Default)]
pub struct ExtractedPdf {
    /// Text of each page, in page order; runs joined by single spaces
    pub pages: Vec<String>,

    /// Title from the document information dictionary
    pub title: Option<String>,

    /// Keywords from the document information dictionary
    pub keywords: Vec<String>,

    /// Degraded-extraction diagnostics
    pub warnings: Vec<String>,
}

impl ExtractedPdf {
    /// All pages joined with a blank line between them
    pub fn content(&self) -> String {
        self.pages
            .iter()
            .filter(|page| !page.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Load a PDF from memory
pub fn load_document(bytes: &[u8]) -> Result<Document, PdfExtractError> {
    // lopdf asserts on some malformed dictionaries instead of returning an error
    let document = match panic::catch_unwind(|| Document::load_mem(bytes)) {
        Ok(loaded) => loaded.map_err(|e| PdfExtractError::InvalidFile(e.to_string()))?,
        Err(_) => {
            return Err(PdfExtractError::InvalidFile(
                "document structure is malformed".to_string(),
            ))
        }
    };

    if document.is_encrypted() {
        return Err(PdfExtractError::Encrypted);
    }

    Ok(document)
}

/// Extract the text and metadata of a PDF held in memory.
///
/// Fails only when the document cannot be opened or no text at all can be
/// decoded; partial failures become warnings.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedPdf, PdfExtractError> {
    panic::catch_unwind(|| extract_from_bytes(bytes)).unwrap_or_else(|_| {
        Err(PdfExtractError::ExtractionFailed(
            "text decoder aborted on malformed content".to_string(),
        ))
    })
}

fn extract_from_bytes(bytes: &[u8]) -> Result<ExtractedPdf, PdfExtractError> {
    let document = load_document(bytes)?;
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(PdfExtractError::NoPages);
    }

    let mut extracted = ExtractedPdf::default();
    let mut failed_pages = Vec::new();

    for page_number in &page_numbers {
        let page = panic::catch_unwind(AssertUnwindSafe(|| {
            document.extract_text(&[*page_number])
        }));
        match page {
            Ok(Ok(text)) => extracted.pages.push(join_runs(&text)),
            Ok(Err(e)) => {
                tracing::debug!("Failed to extract text from page {}: {}", page_number, e);
                failed_pages.push(*page_number);
            }
            Err(_) => {
                tracing::debug!("Text decoder aborted on page {}", page_number);
                failed_pages.push(*page_number);
            }
        }
    }

    if failed_pages.len() == page_numbers.len() {
        tracing::debug!("No page decoded through lopdf, trying pdf-extract");
        let text = extract_text_fallback(bytes)?;
        extracted.pages = text
            .split('\u{c}')
            .map(join_runs)
            .collect();
        extracted.warnings.push(
            "PDF pages could not be decoded individually; text was extracted from the whole document and layout may be lost"
                .to_string(),
        );
    } else if !failed_pages.is_empty() {
        extracted.warnings.push(format!(
            "Could not extract text from page(s) {}",
            failed_pages
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    match info_dictionary(&document) {
        Some(info) => {
            extracted.title = info_string(info, b"Title");
            extracted.keywords = info_string(info, b"Keywords")
                .map(|list| crate::utils::text::split_keywords(&list))
                .unwrap_or_default();
        }
        None => extracted
            .warnings
            .push("PDF metadata unavailable; title may be inaccurate".to_string()),
    }

    Ok(extracted)
}

/// Whole-document extraction through pdf-extract
fn extract_text_fallback(bytes: &[u8]) -> Result<String, PdfExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning an error
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
        Ok(Ok(_)) => Err(PdfExtractError::ExtractionFailed(
            "document contains no extractable text".to_string(),
        )),
        Ok(Err(e)) => Err(PdfExtractError::ExtractionFailed(e.to_string())),
        Err(_) => Err(PdfExtractError::ExtractionFailed(
            "text decoder aborted on malformed content".to_string(),
        )),
    }
}

/// Collapse the text runs of one page onto a single line
pub fn join_runs(page_text: &str) -> String {
    page_text
        .lines()
        .map(str::trim)
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The document information dictionary, whether inline or referenced
fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// A non-empty text entry of the information dictionary
fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    let text = decode_pdf_string(bytes);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Decode a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise PDFDocEncoding (treated as Latin-1)
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}
