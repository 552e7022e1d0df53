//! Content enhancement collaborator.
//!
//! Enhancement (summaries, extra keywords, research questions) is provided by
//! an external service. This crate only defines the interface; the parsing
//! service calls it when a caller asks for it and treats any failure as a
//! warning, never as a parse failure.

mod mock;

pub use mock::MockEnhancer;

use async_trait::async_trait;

use crate::models::{EnhancedDocument, StructuredDocument};

/// An external service that enriches a parsed document
#[async_trait]
pub trait ContentEnhancer: Send + Sync + std::fmt::Debug {
    /// Human-readable name of the enhancer, used in logs
    fn name(&self) -> &str;

    /// Enrich a parsed document
    async fn enhance(
        &self,
        document: &StructuredDocument,
    ) -> Result<EnhancedDocument, EnhancementError>;
}

/// Errors reported by an enhancement collaborator
#[derive(Debug, thiserror::Error)]
pub enum EnhancementError {
    /// The service could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service refused the document
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}
