//! The structured output of a parse.

use serde::{Deserialize, Serialize};

use super::DocumentFormat;

/// The named manuscript sections the extractor recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Abstract,
    Introduction,
    Background,
    LiteratureReview,
    Methods,
    Results,
    Discussion,
    Conclusion,
    References,
    Appendix,
}

impl SectionKind {
    /// Returns the display name of the section
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Abstract => "Abstract",
            SectionKind::Introduction => "Introduction",
            SectionKind::Background => "Background",
            SectionKind::LiteratureReview => "Literature Review",
            SectionKind::Methods => "Methods",
            SectionKind::Results => "Results",
            SectionKind::Discussion => "Discussion",
            SectionKind::Conclusion => "Conclusion",
            SectionKind::References => "References",
            SectionKind::Appendix => "Appendix",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One heading-delimited block of a manuscript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub kind: SectionKind,

    /// The heading line as it appeared in the text
    pub heading: String,

    /// Body text, trimmed
    pub text: String,
}

/// A manuscript converted into named sections.
///
/// `error` is the only failure signal: when it is set, nothing but `warnings`
/// carries meaning. Warnings never block use of the extracted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literature_review: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,

    /// Keywords in detection order; duplicates are kept
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Every detected section in document order, including those without a
    /// dedicated field (references, appendix)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<DocumentSection>,

    /// Full extracted text
    #[serde(default)]
    pub content: String,

    /// Which parser produced this document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,

    /// Non-blocking diagnostics, append-only
    #[serde(default)]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredDocument {
    /// Create an empty successful document for the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a failed document carrying only the error message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Start building a document
    pub fn builder(content: impl Into<String>) -> StructuredDocumentBuilder {
        StructuredDocumentBuilder::new(content)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Append a warning
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// The dedicated field for a section kind, if it has one
    pub fn field(&self, kind: SectionKind) -> Option<&str> {
        match kind {
            SectionKind::Abstract => self.r#abstract.as_deref(),
            SectionKind::Introduction => self.introduction.as_deref(),
            SectionKind::Background | SectionKind::LiteratureReview => {
                self.literature_review.as_deref()
            }
            SectionKind::Methods => self.methods.as_deref(),
            SectionKind::Results => self.results.as_deref(),
            SectionKind::Discussion => self.discussion.as_deref(),
            SectionKind::Conclusion => self.conclusion.as_deref(),
            SectionKind::References | SectionKind::Appendix => None,
        }
    }

    /// Mutable access to the dedicated field for a section kind
    pub fn field_mut(&mut self, kind: SectionKind) -> Option<&mut Option<String>> {
        match kind {
            SectionKind::Abstract => Some(&mut self.r#abstract),
            SectionKind::Introduction => Some(&mut self.introduction),
            SectionKind::Background | SectionKind::LiteratureReview => {
                Some(&mut self.literature_review)
            }
            SectionKind::Methods => Some(&mut self.methods),
            SectionKind::Results => Some(&mut self.results),
            SectionKind::Discussion => Some(&mut self.discussion),
            SectionKind::Conclusion => Some(&mut self.conclusion),
            SectionKind::References | SectionKind::Appendix => None,
        }
    }

    /// Whether any named section field is populated
    pub fn has_sections(&self) -> bool {
        [
            &self.r#abstract,
            &self.introduction,
            &self.literature_review,
            &self.methods,
            &self.results,
            &self.discussion,
            &self.conclusion,
        ]
        .iter()
        .any(|field| field.is_some())
    }
}

/// Builder for constructing StructuredDocument objects
#[derive(Debug, Clone)]
pub struct StructuredDocumentBuilder {
    document: StructuredDocument,
}

impl StructuredDocumentBuilder {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            document: StructuredDocument::new(content),
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.document.title = Some(title.into());
        self
    }

    /// Set the title if one was found
    pub fn maybe_title(mut self, title: Option<String>) -> Self {
        self.document.title = title;
        self
    }

    /// Set the abstract
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.document.r#abstract = Some(text.into());
        self
    }

    /// Set keywords
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.document.keywords = keywords;
        self
    }

    /// Record the producing format
    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.document.format = Some(format);
        self
    }

    /// Add a warning
    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.document.warnings.push(warning.into());
        self
    }

    /// Add several warnings, keeping their order
    pub fn warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.document.warnings.extend(warnings);
        self
    }

    pub fn build(self) -> StructuredDocument {
        self.document
    }
}

/// A structured document plus the output of the enhancement collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedDocument {
    #[serde(flatten)]
    pub document: StructuredDocument,

    #[serde(rename = "aiEnhanced")]
    pub ai_enhanced: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enhanced_keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub research_questions: Vec<String>,
}

impl EnhancedDocument {
    /// Wrap a document that was not enhanced
    pub fn plain(document: StructuredDocument) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.document.is_error()
    }
}

impl From<StructuredDocument> for EnhancedDocument {
    fn from(document: StructuredDocument) -> Self {
        Self::plain(document)
    }
}
