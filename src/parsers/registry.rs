//! Registry of format parsers.

use std::sync::{Arc, OnceLock};

use super::{
    DocumentParser, PagesParser, ParseError, PdfParser, TextParser, WordParser,
};
use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};

static GLOBAL_REGISTRY: OnceLock<ParserRegistry> = OnceLock::new();

/// Ordered list of all available format parsers.
///
/// Registration order is Text, Word, PDF, Pages and only matters as a
/// tie-break: the first parser that accepts a document handles it. The
/// registry is never mutated after construction, so one instance is shared
/// by every concurrent parse.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Create a new registry with all available parsers
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: Vec::new(),
        };

        registry.register(Arc::new(TextParser::new()));
        registry.register(Arc::new(WordParser::new()));
        registry.register(Arc::new(PdfParser::new()));
        registry.register(Arc::new(PagesParser::new()));

        registry
    }

    /// The process-wide registry, built on first use
    pub fn global() -> &'static ParserRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let registry = ParserRegistry::new();
            tracing::debug!(parsers = registry.len(), "Parser registry initialized");
            registry
        })
    }

    /// Build the process-wide registry now. Later calls are no-ops.
    pub fn init() {
        let _ = Self::global();
    }

    fn register(&mut self, parser: Arc<dyn DocumentParser>) {
        self.parsers.push(parser);
    }

    /// Find the parser for a document.
    ///
    /// A specific declared MIME type is matched first across all parsers;
    /// otherwise the first parser whose MIME type or extension matches wins.
    pub fn find_parser(&self, raw: &RawDocument) -> Option<&dyn DocumentParser> {
        let by_mime = if raw.is_generic_mime() {
            None
        } else {
            self.parsers.iter().find(|p| p.supports_mime(raw))
        };

        by_mime
            .or_else(|| self.parsers.iter().find(|p| p.supports(raw)))
            .map(|p| p.as_ref())
    }

    /// Parse a document with the matching parser.
    ///
    /// This is the entry point for callers at the boundary: it always returns
    /// a document, with `error` set when parsing failed.
    pub fn parse(&self, raw: &RawDocument, options: &ParserOptions) -> StructuredDocument {
        match self.find_parser(raw) {
            Some(parser) => {
                tracing::debug!(
                    file = raw.file_name(),
                    parser = parser.format().id(),
                    "Dispatching document"
                );
                parser.parse_file(raw, options)
            }
            None => {
                let error = ParseError::Unsupported(raw.type_label());
                tracing::info!(file = raw.file_name(), "{}", error);
                StructuredDocument::failed(error.to_string())
            }
        }
    }

    /// Parse a document, returning the failure as a typed error
    pub fn try_parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        let parser = self
            .find_parser(raw)
            .ok_or_else(|| ParseError::Unsupported(raw.type_label()))?;
        let mut document = parser.parse(raw, options)?;
        document.format = Some(parser.format());
        Ok(document)
    }

    /// Get the parser for a format
    pub fn get(&self, format: DocumentFormat) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.format() == format)
            .map(|p| p.as_ref())
    }

    /// Get all registered parsers in registration order
    pub fn all(&self) -> impl Iterator<Item = &dyn DocumentParser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    /// Get the registered formats in registration order
    pub fn formats(&self) -> Vec<DocumentFormat> {
        self.all().map(|p| p.format()).collect()
    }

    /// Every extension some parser accepts
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.all().flat_map(|p| p.extensions().iter().copied()).collect()
    }

    /// Get the number of registered parsers
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
