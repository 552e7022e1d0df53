//! PDF manuscripts.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::SectionExtractor;
use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};
use crate::parsers::{DocumentParser, ParseError};
use crate::utils::pdf::{self, ExtractedPdf};
use crate::utils::text::{first_non_blank_line, split_keywords};

static KEYWORDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)keywords:\s*([^\n]+)").expect("valid regex"));

/// Parser for PDF documents.
///
/// Page order is preserved; the information-dictionary title takes precedence
/// over any line-based guess because PDF text order is unreliable.
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    /// Turn extracted PDF text into a document. Shared with the Pages parser
    /// for embedded preview PDFs.
    pub(crate) fn build_document(extracted: ExtractedPdf, options: &ParserOptions) -> StructuredDocument {
        let content = extracted.content();
        let mut keywords = find_keywords(&content);
        if keywords.is_empty() {
            keywords = extracted.keywords;
        }

        // Metadata wins over the first-line guess
        let title = if options.extract_title {
            extracted
                .title
                .or_else(|| first_non_blank_line(&content))
        } else {
            None
        };

        let sections = SectionExtractor::new().extract(&content);
        let mut document = StructuredDocument::builder(content)
            .maybe_title(title)
            .keywords(keywords)
            .warnings(extracted.warnings)
            .build();
        sections.apply_to(&mut document, false);
        document
    }
}

impl DocumentParser for PdfParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn mime_types(&self) -> &'static [&'static str] {
        &["application/pdf", "application/x-pdf"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        let extracted = pdf::extract_text(raw.bytes())?;
        let page_count = extracted.pages.len();
        let document = Self::build_document(extracted, options);

        tracing::debug!(
            file = raw.file_name(),
            pages = page_count,
            chars = document.content.len(),
            "Parsed PDF document"
        );

        Ok(document)
    }
}

/// Keywords from the first `keywords:` match in the text
fn find_keywords(content: &str) -> Vec<String> {
    KEYWORDS_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| split_keywords(m.as_str()))
        .unwrap_or_default()
}
