//! # Manuscript Parser
//!
//! Turns uploaded manuscripts (plain text, Word, PDF and Apple Pages) into a
//! uniform structured research document: title, abstract, the usual paper
//! sections and keywords, plus warnings describing any loss of fidelity.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (RawDocument, StructuredDocument, etc.)
//! - [`parsers`]: Format parsers behind the [`DocumentParser`] trait, and the
//!   [`ParserRegistry`] that dispatches uploads to them
//! - [`extract`]: Heading-based section and keyword extraction
//! - [`service`]: The [`ParsingService`] facade used by callers
//! - [`enhance`]: The optional content enhancement collaborator
//! - [`utils`]: Zip, PDF and text helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use manuscript_parser::{ParserOptions, ParsingService, RawDocument};
//!
//! # async fn example() {
//! let raw = RawDocument::new(
//!     b"My Title\nAbstract\nWe study things.".to_vec(),
//!     Some("text/plain"),
//!     "notes.txt",
//! );
//! let result = ParsingService::new().parse(raw, ParserOptions::default()).await;
//! assert_eq!(result.document.title.as_deref(), Some("My Title"));
//! # }
//! ```

pub mod config;
pub mod enhance;
pub mod extract;
pub mod models;
pub mod parsers;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use enhance::{ContentEnhancer, EnhancementError};
pub use models::{EnhancedDocument, ParserOptions, RawDocument, StructuredDocument};
pub use parsers::{DocumentParser, ParseError, ParserRegistry};
pub use service::ParsingService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
