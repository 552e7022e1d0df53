//! Heading vocabulary for manuscript sections.

use crate::models::SectionKind;

/// Recognized heading terms, longest first so multi-word terms win
const HEADINGS: &[(&str, SectionKind)] = &[
    ("materials and methods", SectionKind::Methods),
    ("literature review", SectionKind::LiteratureReview),
    ("introduction", SectionKind::Introduction),
    ("methodology", SectionKind::Methods),
    ("conclusions", SectionKind::Conclusion),
    ("background", SectionKind::Background),
    ("conclusion", SectionKind::Conclusion),
    ("discussion", SectionKind::Discussion),
    ("references", SectionKind::References),
    ("abstract", SectionKind::Abstract),
    ("appendix", SectionKind::Appendix),
    ("summary", SectionKind::Abstract),
    ("methods", SectionKind::Methods),
    ("results", SectionKind::Results),
];

/// Classify a line as a section heading.
///
/// Case-insensitive; a line is a heading when it is exactly a term, the term
/// with a trailing colon, or starts with the term followed by a space
/// ("Methods Used").
pub fn match_heading(line: &str) -> Option<SectionKind> {
    let line = line.trim().to_lowercase();
    if line.is_empty() {
        return None;
    }

    HEADINGS.iter().find_map(|(term, kind)| {
        let is_heading = match line.strip_prefix(term) {
            Some("") | Some(":") => true,
            Some(rest) => rest.starts_with(' '),
            None => false,
        };
        is_heading.then_some(*kind)
    })
}

/// Every heading term, for diagnostics and the CLI
pub fn heading_terms() -> impl Iterator<Item = &'static str> {
    HEADINGS.iter().map(|(term, _)| *term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_colon_tolerant() {
        for line in ["Abstract", "ABSTRACT:", "abstract ", "  Abstract  "] {
            assert_eq!(match_heading(line), Some(SectionKind::Abstract), "{:?}", line);
        }
    }

    #[test]
    fn test_prefix_followed_by_space() {
        assert_eq!(match_heading("Methods Used"), Some(SectionKind::Methods));
        assert_eq!(match_heading("Results and Analysis"), Some(SectionKind::Results));
    }

    #[test]
    fn test_not_headings() {
        assert_eq!(match_heading("Abstraction layers"), None);
        assert_eq!(match_heading("Abstract: we study things"), None);
        assert_eq!(match_heading("The introduction"), None);
        assert_eq!(match_heading(""), None);
    }

    #[test]
    fn test_vocabulary_mapping() {
        assert_eq!(match_heading("Summary"), Some(SectionKind::Abstract));
        assert_eq!(match_heading("Methodology"), Some(SectionKind::Methods));
        assert_eq!(match_heading("Literature Review"), Some(SectionKind::LiteratureReview));
        assert_eq!(match_heading("Materials and Methods"), Some(SectionKind::Methods));
        assert_eq!(match_heading("Conclusions"), Some(SectionKind::Conclusion));
        assert_eq!(match_heading("References"), Some(SectionKind::References));
        assert_eq!(match_heading("Appendix A"), Some(SectionKind::Appendix));
    }

    #[test]
    fn test_terms_longest_first() {
        let terms: Vec<_> = heading_terms().collect();
        assert!(terms.windows(2).all(|w| w[0].len() >= w[1].len()));
    }
}
