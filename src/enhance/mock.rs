//! Mock enhancer for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::enhance::{ContentEnhancer, EnhancementError};
use crate::models::{EnhancedDocument, StructuredDocument};

/// What the mock returns from `enhance`
#[derive(Debug, Clone)]
enum MockBehavior {
    Succeed {
        summary: String,
        keywords: Vec<String>,
        questions: Vec<String>,
    },
    Fail(String),
}

/// An enhancer that returns predefined responses.
#[derive(Debug)]
pub struct MockEnhancer {
    behavior: Mutex<MockBehavior>,
    calls: AtomicUsize,
}

impl MockEnhancer {
    /// Create a mock that succeeds with the given summary
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Succeed {
                summary: summary.into(),
                keywords: Vec::new(),
                questions: Vec::new(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always fails with the given reason
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Fail(reason.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the keywords and research questions a successful call returns
    pub fn with_extras(self, keywords: Vec<String>, questions: Vec<String>) -> Self {
        if let Ok(mut guard) = self.behavior.lock() {
            if let MockBehavior::Succeed {
                keywords: k,
                questions: q,
                ..
            } = &mut *guard
            {
                *k = keywords;
                *q = questions;
            }
        }
        self
    }

    /// Make subsequent calls fail
    pub fn set_failure(&self, reason: impl Into<String>) {
        if let Ok(mut guard) = self.behavior.lock() {
            *guard = MockBehavior::Fail(reason.into());
        }
    }

    /// Number of times `enhance` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentEnhancer for MockEnhancer {
    fn name(&self) -> &str {
        "Mock Enhancer"
    }

    async fn enhance(
        &self,
        document: &StructuredDocument,
    ) -> Result<EnhancedDocument, EnhancementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .behavior
            .lock()
            .map_err(|_| EnhancementError::Other("mock state poisoned".to_string()))?
            .clone();

        match behavior {
            MockBehavior::Succeed {
                summary,
                keywords,
                questions,
            } => Ok(EnhancedDocument {
                document: document.clone(),
                ai_enhanced: true,
                enhanced_keywords: keywords,
                summary: Some(summary),
                research_questions: questions,
            }),
            MockBehavior::Fail(reason) => Err(EnhancementError::Unavailable(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_success() {
        let mock = MockEnhancer::new("summary")
            .with_extras(vec!["k".to_string()], vec!["q?".to_string()]);
        let document = StructuredDocument::new("body");

        let enhanced = tokio_test::block_on(mock.enhance(&document)).unwrap();
        assert!(enhanced.ai_enhanced);
        assert_eq!(enhanced.summary.as_deref(), Some("summary"));
        assert_eq!(enhanced.enhanced_keywords, vec!["k"]);
        assert_eq!(enhanced.document, document);
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_mock_failure_switch() {
        let mock = MockEnhancer::new("summary");
        mock.set_failure("quota exceeded");

        let err = tokio_test::block_on(mock.enhance(&StructuredDocument::new("x"))).unwrap_err();
        assert!(matches!(err, EnhancementError::Unavailable(_)));
        assert_eq!(err.to_string(), "Service unavailable: quota exceeded");
    }
}
