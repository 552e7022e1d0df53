//! Parsing service facade.
//!
//! Orchestrates one parse end to end: input guards, registry dispatch on the
//! blocking pool, a section-extraction pass over the parser's output, and the
//! optional enhancement call. Every outcome comes back as an
//! [`EnhancedDocument`]; nothing here returns an error or panics on bad input.

use std::sync::Arc;

use crate::config::Config;
use crate::enhance::ContentEnhancer;
use crate::extract::SectionExtractor;
use crate::models::{EnhancedDocument, ParserOptions, RawDocument, StructuredDocument};
use crate::parsers::{ParseError, ParserRegistry};

/// Default upload limit in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 50;

/// Limits applied before any parser runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Largest accepted upload in bytes
    pub max_file_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
        }
    }
}

impl From<&Config> for ServiceConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_file_size: config.parser.max_file_size_mb.saturating_mul(1024 * 1024),
        }
    }
}

/// Entry point for parsing uploads
#[derive(Debug, Clone)]
pub struct ParsingService {
    registry: &'static ParserRegistry,
    enhancer: Option<Arc<dyn ContentEnhancer>>,
    config: ServiceConfig,
}

impl ParsingService {
    /// Create a service over the global registry, without an enhancer
    pub fn new() -> Self {
        Self {
            registry: ParserRegistry::global(),
            enhancer: None,
            config: ServiceConfig::default(),
        }
    }

    /// Create a service using the limits from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_config(config.into())
    }

    /// Attach an enhancement collaborator
    pub fn with_enhancer(mut self, enhancer: Arc<dyn ContentEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the upload size limit in bytes
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn registry(&self) -> &'static ParserRegistry {
        self.registry
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn has_enhancer(&self) -> bool {
        self.enhancer.is_some()
    }

    /// Parse an upload and, if requested, enhance it.
    ///
    /// Decoding runs on the blocking thread pool so the caller's runtime is
    /// never stalled by large containers.
    #[tracing::instrument(skip_all, fields(file = raw.file_name(), bytes = raw.len()))]
    pub async fn parse(&self, raw: RawDocument, options: ParserOptions) -> EnhancedDocument {
        if let Err(e) = self.check_input(&raw) {
            tracing::info!("Rejected upload: {}", e);
            return EnhancedDocument::plain(StructuredDocument::failed(e.to_string()));
        }

        let registry = self.registry;
        let document =
            match tokio::task::spawn_blocking(move || registry.parse(&raw, &options)).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::error!("Parsing task failed: {}", e);
                    StructuredDocument::failed(format!("Parsing task failed: {}", e))
                }
            };

        if document.is_error() {
            return EnhancedDocument::plain(document);
        }

        let document = post_process(document);

        if !options.enhance_with_ai {
            return EnhancedDocument::plain(document);
        }

        self.enhance(document).await
    }

    /// Parse synchronously on the current thread, without enhancement
    pub fn parse_blocking(&self, raw: &RawDocument, options: &ParserOptions) -> StructuredDocument {
        if let Err(e) = self.check_input(raw) {
            return StructuredDocument::failed(e.to_string());
        }

        let document = self.registry.parse(raw, options);
        if document.is_error() {
            return document;
        }
        post_process(document)
    }

    fn check_input(&self, raw: &RawDocument) -> Result<(), ParseError> {
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }
        if raw.len() > self.config.max_file_size {
            return Err(ParseError::TooLarge {
                size: raw.len(),
                limit: self.config.max_file_size,
            });
        }
        Ok(())
    }

    /// Call the enhancer; failures become a warning on the unenhanced document
    async fn enhance(&self, mut document: StructuredDocument) -> EnhancedDocument {
        let Some(enhancer) = &self.enhancer else {
            document.warn("AI enhancement was requested but no enhancement service is configured");
            return EnhancedDocument::plain(document);
        };

        match enhancer.enhance(&document).await {
            Ok(mut enhanced) => {
                tracing::debug!(enhancer = enhancer.name(), "Document enhanced");
                // The parsed fields stay authoritative
                enhanced.document = document;
                enhanced
            }
            Err(e) => {
                tracing::warn!(enhancer = enhancer.name(), "Enhancement failed: {}", e);
                document.warn(format!("AI enhancement failed: {}", e));
                EnhancedDocument::plain(document)
            }
        }
    }
}

impl Default for ParsingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill section fields the format parser left unset from its content.
///
/// Every bundled parser already runs the extractor, so for them this pass is
/// idempotent. It matters for parsers that return unstructured content, and
/// it never overwrites a field that is already set.
fn post_process(mut document: StructuredDocument) -> StructuredDocument {
    let extracted = SectionExtractor::new().extract(&document.content);
    extracted.apply_to(&mut document, false);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::MockEnhancer;
    use crate::models::DocumentFormat;
    use crate::utils::fixtures::pdf_with_pages;

    fn text_upload(text: &str) -> RawDocument {
        RawDocument::new(text.as_bytes().to_vec(), Some("text/plain"), "notes.txt")
    }

    #[tokio::test]
    async fn test_parse_text() {
        let service = ParsingService::new();
        let result = service
            .parse(text_upload("T\nAbstract\nA.\nResults\nR."), ParserOptions::default())
            .await;

        assert!(!result.is_error());
        assert!(!result.ai_enhanced);
        assert_eq!(result.document.r#abstract.as_deref(), Some("A."));
        assert_eq!(result.document.results.as_deref(), Some("R."));
    }

    #[tokio::test]
    async fn test_pdf_sections_through_service() {
        let bytes = pdf_with_pages(&["Abstract", "We did things."]);
        let raw = RawDocument::new(bytes, Some("application/pdf"), "paper.pdf");
        let result = ParsingService::new().parse(raw, ParserOptions::default()).await;

        assert!(!result.is_error(), "{:?}", result.document.error);
        assert_eq!(result.document.format, Some(DocumentFormat::Pdf));
        assert_eq!(result.document.r#abstract.as_deref(), Some("We did things."));
    }

    #[tokio::test]
    async fn test_unsupported_type() {
        let raw = RawDocument::new(b"x".to_vec(), Some("application/octet-stream"), "a.xyz");
        let result = ParsingService::new().parse(raw, ParserOptions::default()).await;
        assert_eq!(
            result.document.error.as_deref(),
            Some("Unsupported file type: xyz")
        );
    }

    #[tokio::test]
    async fn test_empty_and_oversize_uploads() {
        let service = ParsingService::new().with_max_file_size(4);

        let empty = service.parse(text_upload(""), ParserOptions::default()).await;
        assert_eq!(empty.document.error.as_deref(), Some("Document is empty"));

        let large = service.parse(text_upload("too long"), ParserOptions::default()).await;
        assert!(large.document.error.unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn test_enhancement_success() {
        let enhancer = Arc::new(
            MockEnhancer::new("A short summary")
                .with_extras(vec!["heat".to_string()], vec!["Why?".to_string()]),
        );
        let service = ParsingService::new().with_enhancer(enhancer.clone());

        let result = service
            .parse(
                text_upload("Title\nbody"),
                ParserOptions::default().enhance_with_ai(true),
            )
            .await;

        assert!(result.ai_enhanced);
        assert_eq!(result.summary.as_deref(), Some("A short summary"));
        assert_eq!(result.enhanced_keywords, vec!["heat"]);
        assert_eq!(result.research_questions, vec!["Why?"]);
        assert_eq!(result.document.title.as_deref(), Some("Title"));
        assert_eq!(enhancer.calls(), 1);
    }

    #[tokio::test]
    async fn test_enhancement_failure_is_a_warning() {
        let enhancer = Arc::new(MockEnhancer::failing("timeout"));
        let service = ParsingService::new().with_enhancer(enhancer);

        let result = service
            .parse(
                text_upload("Title\nbody"),
                ParserOptions::default().enhance_with_ai(true),
            )
            .await;

        assert!(!result.is_error());
        assert!(!result.ai_enhanced);
        assert_eq!(result.document.warnings.len(), 1);
        assert!(result.document.warnings[0].contains("timeout"));
    }

    #[tokio::test]
    async fn test_enhancer_not_called_unless_requested() {
        let enhancer = Arc::new(MockEnhancer::new("unused"));
        let service = ParsingService::new().with_enhancer(enhancer.clone());

        let result = service
            .parse(text_upload("Title\nbody"), ParserOptions::default())
            .await;

        assert!(!result.ai_enhanced);
        assert_eq!(enhancer.calls(), 0);
    }

    #[tokio::test]
    async fn test_enhancer_not_called_on_error() {
        let enhancer = Arc::new(MockEnhancer::new("unused"));
        let service = ParsingService::new().with_enhancer(enhancer.clone());
        let raw = RawDocument::from_bytes(b"junk".to_vec(), "a.pages");

        let result = service
            .parse(raw, ParserOptions::default().enhance_with_ai(true))
            .await;

        assert!(result.is_error());
        assert_eq!(enhancer.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_enhancer_warns() {
        let result = ParsingService::new()
            .parse(
                text_upload("Title\nbody"),
                ParserOptions::default().enhance_with_ai(true),
            )
            .await;
        assert!(!result.ai_enhanced);
        assert_eq!(result.document.warnings.len(), 1);
    }

    #[test]
    fn test_service_config_from_config() {
        let mut config = Config::default();
        config.parser.max_file_size_mb = 2;
        let service = ParsingService::from_config(&config);
        assert_eq!(service.config().max_file_size, 2 * 1024 * 1024);
        assert!(!service.has_enhancer());
    }

    #[test]
    fn test_post_process_fills_only_unset_fields() {
        let filled = post_process(StructuredDocument::new("Abstract\nFound."));
        assert_eq!(filled.r#abstract.as_deref(), Some("Found."));

        let kept = post_process(
            StructuredDocument::builder("Abstract\nFound.")
                .abstract_text("Kept")
                .build(),
        );
        assert_eq!(kept.r#abstract.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_max_file_size_saturates() {
        let mut config = Config::default();
        config.parser.max_file_size_mb = usize::MAX;
        assert_eq!(ServiceConfig::from(&config).max_file_size, usize::MAX);
    }

    #[test]
    fn test_parse_blocking() {
        let service = ParsingService::new();
        let doc = service.parse_blocking(&text_upload("Title\nbody"), &ParserOptions::default());
        assert_eq!(doc.title.as_deref(), Some("Title"));
    }
}
