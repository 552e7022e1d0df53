//! Plain text manuscripts.

use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};
use crate::parsers::{structure_text, DocumentParser, ParseError};
use crate::utils::text::{clean_text, decode_utf8, keywords_from_filename};

/// Parser for UTF-8 text files (with or without a byte order mark)
#[derive(Debug, Clone, Default)]
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for TextParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Text
    }

    fn mime_types(&self) -> &'static [&'static str] {
        &["text/plain", "text/markdown"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt", "text", "md"]
    }

    fn parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        let (decoded, lossy) = decode_utf8(raw.bytes());
        let text = clean_text(&decoded);

        let mut document = structure_text(&text, options);
        if lossy {
            document.warn("File is not valid UTF-8; undecodable bytes were replaced");
        }

        // Explicit keyword lines win; the file name is only a fallback
        if document.keywords.is_empty()
            && crate::extract::extract_keywords(&text.lines().collect::<Vec<_>>()).is_none()
        {
            document.keywords = keywords_from_filename(raw.file_stem());
        }

        tracing::debug!(
            file = raw.file_name(),
            chars = document.content.len(),
            sections = document.sections.len(),
            "Parsed text document"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8], name: &str) -> StructuredDocument {
        TextParser::new().parse_file(
            &RawDocument::new(bytes.to_vec(), Some("text/plain"), name),
            &ParserOptions::default(),
        )
    }

    #[test]
    fn test_title_abstract_introduction() {
        let doc = parse(
            b"My Title\nAbstract\nLine one.\nLine two.\nIntroduction\nBody.",
            "notes.txt",
        );
        assert!(doc.error.is_none());
        assert_eq!(doc.title.as_deref(), Some("My Title"));
        assert_eq!(doc.r#abstract.as_deref(), Some("Line one.\nLine two."));
        assert_eq!(doc.introduction.as_deref(), Some("Body."));
        assert_eq!(doc.format, Some(DocumentFormat::Text));
    }

    #[test]
    fn test_bom_is_stripped() {
        let doc = parse(b"\xEF\xBB\xBFTitle\r\nbody\r\n", "a.txt");
        assert_eq!(doc.title.as_deref(), Some("Title"));
        assert_eq!(doc.content, "Title\nbody");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_explicit_keywords() {
        let doc = parse(b"Title\nKeywords: alpha, beta , gamma\n", "climate-modelling.txt");
        assert_eq!(doc.keywords, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_filename_keywords_fallback() {
        let doc = parse(b"Title\nNothing else", "the-climate_modelling draft.txt");
        assert_eq!(doc.keywords, vec!["climate", "modelling"]);
    }

    #[test]
    fn test_empty_keyword_line_suppresses_filename_fallback() {
        let doc = parse(b"Title\nKeywords:\n", "climate-model.txt");
        assert!(doc.keywords.is_empty());
    }

    #[test]
    fn test_invalid_utf8_warns() {
        let doc = parse(b"Title \xFF\nbody", "a.txt");
        assert!(doc.error.is_none());
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn test_supports() {
        let parser = TextParser::new();
        for ext in parser.extensions() {
            let raw = RawDocument::from_bytes(Vec::new(), format!("file.{}", ext));
            assert!(parser.supports(&raw));
        }
        let by_mime = RawDocument::new(Vec::new(), Some("text/plain"), "upload");
        assert!(parser.supports(&by_mime));
        let other = RawDocument::new(Vec::new(), Some("application/octet-stream"), "a.pdf");
        assert!(!parser.supports(&other));
    }

    #[test]
    fn test_deterministic() {
        let bytes = b"T\nAbstract\nx\nKeywords: a; b";
        assert_eq!(parse(bytes, "t.txt"), parse(bytes, "t.txt"));
    }
}
