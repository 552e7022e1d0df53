//! Format parsers with a shared trait-based contract.
//!
//! This module defines the [`DocumentParser`] trait every format parser
//! implements, and the [`ParserRegistry`] that dispatches an upload to the
//! first parser that claims it.
//!
//! # Supported Formats
//!
//! | Parser | MIME types | Extensions |
//! |--------|------------|------------|
//! | [`TextParser`] | `text/plain`, `text/markdown` | `txt`, `text`, `md` |
//! | [`WordParser`] | OOXML word-processing, `application/msword` | `docx`, `doc` |
//! | [`PdfParser`] | `application/pdf` | `pdf` |
//! | [`PagesParser`] | `application/vnd.apple.pages` | `pages` |
//!
//! # Failure Handling
//!
//! [`DocumentParser::parse`] returns a typed [`ParseError`] for every expected
//! failure (corrupt container, missing entries, undecodable text).
//! [`DocumentParser::parse_file`] folds that error into the `error` field of a
//! [`StructuredDocument`], which is the shape callers at the boundary receive.
//! Conditions that only reduce fidelity are reported as warnings instead.

mod pages;
mod pdf;
mod registry;
mod text;
mod word;

pub use pages::PagesParser;
pub use pdf::PdfParser;
pub use registry::ParserRegistry;
pub use text::TextParser;
pub use word::WordParser;

use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};
use crate::utils::PdfExtractError;

/// The contract every format parser implements.
///
/// # Implementing a New Parser
///
/// 1. Create a struct implementing `DocumentParser`
/// 2. Declare the MIME types and extensions it accepts
/// 3. Implement `parse`, returning `Err` for expected failures
/// 4. Register it in `ParserRegistry::new()`
pub trait DocumentParser: Send + Sync + std::fmt::Debug {
    /// The format this parser handles
    fn format(&self) -> DocumentFormat;

    /// MIME types this parser accepts (lower-case)
    fn mime_types(&self) -> &'static [&'static str];

    /// File extensions this parser accepts (lower-case, without the dot)
    fn extensions(&self) -> &'static [&'static str];

    /// Whether the declared MIME type is one this parser accepts
    fn supports_mime(&self, raw: &RawDocument) -> bool {
        raw.mime_type()
            .is_some_and(|mime| self.mime_types().contains(&mime.as_str()))
    }

    /// Whether the file extension is one this parser accepts
    fn supports_extension(&self, raw: &RawDocument) -> bool {
        raw.extension()
            .is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }

    /// Whether this parser can handle the document: MIME type first, file
    /// extension as the fallback
    fn supports(&self, raw: &RawDocument) -> bool {
        self.supports_mime(raw) || self.supports_extension(raw)
    }

    /// Parse the document, returning a typed error for expected failures
    fn parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError>;

    /// Parse the document, folding any failure into the `error` field
    fn parse_file(&self, raw: &RawDocument, options: &ParserOptions) -> StructuredDocument {
        match self.parse(raw, options) {
            Ok(mut document) => {
                document.format = Some(self.format());
                document
            }
            Err(e) => {
                tracing::warn!(
                    file = raw.file_name(),
                    format = self.format().id(),
                    "Parse failed: {}",
                    e
                );
                StructuredDocument::failed(e.to_string())
            }
        }
    }
}

/// Errors that end a parse without a usable document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No registered parser accepts the file
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    /// The container is not a zip archive at all
    #[error("Invalid {0} document: missing zip signature")]
    InvalidSignature(&'static str),

    /// The container could not be opened or is structurally invalid
    #[error("Failed to open document container: {0}")]
    Container(String),

    /// The container opened but holds none of the expected content
    #[error("{0}")]
    MissingContent(String),

    /// Content was found but could not be decoded
    #[error("Failed to decode document: {0}")]
    Decode(String),

    /// The upload holds no bytes
    #[error("Document is empty")]
    Empty,

    /// The upload exceeds the configured size limit
    #[error("Document is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
}

impl From<zip::result::ZipError> for ParseError {
    fn from(err: zip::result::ZipError) -> Self {
        ParseError::Container(err.to_string())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Decode(format!("XML: {}", err))
    }
}

impl From<PdfExtractError> for ParseError {
    fn from(err: PdfExtractError) -> Self {
        match err {
            PdfExtractError::InvalidFile(msg) => ParseError::Container(msg),
            other => ParseError::Decode(other.to_string()),
        }
    }
}

/// Run the shared line heuristics over extracted plain text.
///
/// Title is the first non-blank line (when enabled); sections and keywords
/// come from the section extractor.
pub(crate) fn structure_text(
    text: &str,
    options: &ParserOptions,
) -> StructuredDocument {
    let mut document = StructuredDocument::new(text);
    if options.extract_title {
        document.title = crate::utils::text::first_non_blank_line(text);
    }
    crate::extract::SectionExtractor::new()
        .extract(text)
        .apply_to(&mut document, true);
    document
}
