//! Heuristic section extraction.
//!
//! Maps linear manuscript text onto named sections with a single forward pass
//! over its lines:
//!
//! - a line matching a heading term (see [`match_heading`]) closes the current
//!   section and opens a new one;
//! - every other line is appended to the open section;
//! - lines before the first heading belong to no section and stay in the
//!   document content only.
//!
//! Keyword detection is a separate scan: the first line containing
//! `keywords:` (any case) supplies the keyword list.
//!
//! Finding no headings is an ordinary outcome, not an error.

mod headings;

pub use headings::{heading_terms, match_heading};

use crate::models::{DocumentSection, SectionKind, StructuredDocument};
use crate::utils::text::split_keywords;

/// The marker that introduces a keyword line
const KEYWORDS_MARKER: &str = "keywords:";

/// Sections and keywords found in a run of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSections {
    /// Detected sections in document order
    pub sections: Vec<DocumentSection>,

    /// Keywords from the first keyword line; `None` when there was no such line
    pub keywords: Option<Vec<String>>,
}

impl ExtractedSections {
    /// Whether any heading was detected
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Write the sections into a document.
    ///
    /// With `overwrite == false` only fields that are still unset are filled,
    /// so values the format parser already chose win.
    pub fn apply_to(&self, document: &mut StructuredDocument, overwrite: bool) {
        let mut merged: Vec<(SectionKind, String)> = Vec::new();
        for section in self.sections.iter().filter(|s| !s.text.is_empty()) {
            if document.field_mut(section.kind).is_none() {
                continue;
            }
            match merged.iter_mut().find(|(kind, _)| same_field(*kind, section.kind)) {
                Some((_, text)) => {
                    text.push_str("\n\n");
                    text.push_str(&section.text);
                }
                None => merged.push((section.kind, section.text.clone())),
            }
        }

        for (kind, text) in merged {
            if let Some(field) = document.field_mut(kind) {
                if overwrite || field.is_none() {
                    *field = Some(text);
                }
            }
        }

        if document.sections.is_empty() || overwrite {
            document.sections = self.sections.clone();
        }

        if let Some(keywords) = &self.keywords {
            if overwrite || document.keywords.is_empty() {
                document.keywords = keywords.clone();
            }
        }
    }
}

/// Whether two section kinds share a document field
fn same_field(a: SectionKind, b: SectionKind) -> bool {
    let field_group = |kind: SectionKind| match kind {
        SectionKind::Background => SectionKind::LiteratureReview,
        other => other,
    };
    field_group(a) == field_group(b)
}

/// Splits manuscript text into named sections
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract sections and keywords from a block of text
    pub fn extract(&self, text: &str) -> ExtractedSections {
        let lines: Vec<&str> = text.lines().collect();
        self.extract_lines(&lines)
    }

    /// Extract sections and keywords from a line sequence
    pub fn extract_lines<S: AsRef<str>>(&self, lines: &[S]) -> ExtractedSections {
        let mut sections = Vec::new();
        let mut current: Option<(SectionKind, String)> = None;
        let mut buffer = String::new();

        for line in lines {
            let line = line.as_ref();
            match match_heading(line) {
                Some(kind) => {
                    if let Some((previous, heading)) = current.take() {
                        sections.push(DocumentSection {
                            kind: previous,
                            heading,
                            text: buffer.trim().to_string(),
                        });
                    }
                    current = Some((kind, line.trim().to_string()));
                    buffer.clear();
                }
                None => {
                    buffer.push_str(line);
                    buffer.push('\n');
                }
            }
        }

        if let Some((kind, heading)) = current {
            sections.push(DocumentSection {
                kind,
                heading,
                text: buffer.trim().to_string(),
            });
        }

        tracing::debug!(sections = sections.len(), "Section extraction finished");

        ExtractedSections {
            sections,
            keywords: extract_keywords(lines),
        }
    }
}

/// Find the first keyword line and split what follows the marker.
///
/// Returns `None` when no line contains the marker.
pub fn extract_keywords<S: AsRef<str>>(lines: &[S]) -> Option<Vec<String>> {
    lines.iter().find_map(|line| {
        let line = line.as_ref();
        // ASCII lower-casing keeps byte offsets valid for slicing the original
        let position = line.to_ascii_lowercase().find(KEYWORDS_MARKER)?;
        Some(split_keywords(&line[position + KEYWORDS_MARKER.len()..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_from(text: &str) -> StructuredDocument {
        let mut document = StructuredDocument::new(text);
        SectionExtractor::new()
            .extract(text)
            .apply_to(&mut document, true);
        document
    }

    #[test]
    fn test_basic_sections() {
        let doc = doc_from("My Title\nAbstract\nLine one.\nLine two.\nIntroduction\nBody.");
        assert_eq!(doc.r#abstract.as_deref(), Some("Line one.\nLine two."));
        assert_eq!(doc.introduction.as_deref(), Some("Body."));
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].heading, "Abstract");
    }

    #[test]
    fn test_no_headings_leaves_fields_unset() {
        let text = "Just some notes\nwith no structure at all.";
        let doc = doc_from(text);
        assert!(!doc.has_sections());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.content, text);
    }

    #[test]
    fn test_heading_variants_behave_identically() {
        for heading in ["Abstract", "ABSTRACT:", "abstract "] {
            let text = format!("preamble\n{}\nBody text.", heading);
            let doc = doc_from(&text);
            assert_eq!(doc.r#abstract.as_deref(), Some("Body text."), "{:?}", heading);
        }
    }

    #[test]
    fn test_body_line_starting_with_term_opens_section() {
        let doc = doc_from("Abstract\nSummary text.");
        assert!(doc.r#abstract.is_none());
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading, "Summary text.");
    }

    #[test]
    fn test_all_fields() {
        let text = "Abstract\na\nIntroduction\nb\nLiterature Review\nc\nMethods\nd\nResults\ne\nDiscussion\nf\nConclusion\ng\nReferences\n[1] Someone";
        let doc = doc_from(text);
        assert_eq!(doc.r#abstract.as_deref(), Some("a"));
        assert_eq!(doc.introduction.as_deref(), Some("b"));
        assert_eq!(doc.literature_review.as_deref(), Some("c"));
        assert_eq!(doc.methods.as_deref(), Some("d"));
        assert_eq!(doc.results.as_deref(), Some("e"));
        assert_eq!(doc.discussion.as_deref(), Some("f"));
        assert_eq!(doc.conclusion.as_deref(), Some("g"));
        assert_eq!(doc.sections.last().unwrap().kind, SectionKind::References);
        assert_eq!(doc.sections.last().unwrap().text, "[1] Someone");
    }

    #[test]
    fn test_background_feeds_literature_review() {
        let doc = doc_from("Background\nearlier work\nLiterature Review\nmore work");
        assert_eq!(
            doc.literature_review.as_deref(),
            Some("earlier work\n\nmore work")
        );
    }

    #[test]
    fn test_empty_section_does_not_set_field() {
        let doc = doc_from("Abstract\nIntroduction\ntext");
        assert!(doc.r#abstract.is_none());
        assert_eq!(doc.introduction.as_deref(), Some("text"));
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn test_keywords() {
        let lines = ["Title", "Keywords: alpha, beta , gamma", "KEYWORDS: other"];
        assert_eq!(
            extract_keywords(&lines),
            Some(vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()])
        );
    }

    #[test]
    fn test_keywords_marker_inside_line() {
        let lines = ["Index keywords: one; two;; three"];
        assert_eq!(
            extract_keywords(&lines),
            Some(vec!["one".to_string(), "two".to_string(), "three".to_string()])
        );
        assert_eq!(extract_keywords(&["no marker here"]), None);
    }

    #[test]
    fn test_fill_only_unset_fields() {
        let mut document = StructuredDocument::new("Abstract\nfrom text");
        document.r#abstract = Some("from parser".to_string());
        document.keywords = vec!["kept".to_string()];

        let extracted = SectionExtractor::new().extract("Abstract\nfrom text\nKeywords: new");
        extracted.apply_to(&mut document, false);

        assert_eq!(document.r#abstract.as_deref(), Some("from parser"));
        assert_eq!(document.keywords, vec!["kept"]);
        assert_eq!(document.sections.len(), 1);
    }
}
