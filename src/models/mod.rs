//! Core data models for manuscript parsing.

mod document;
mod input;

pub use document::{
    DocumentSection, EnhancedDocument, SectionKind, StructuredDocument, StructuredDocumentBuilder,
};
pub use input::{DocumentFormat, ParserOptions, RawDocument};
