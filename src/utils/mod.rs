//! Utility modules supporting the format parsers.
//!
//! - [`archive`]: in-memory zip containers (Word, Pages)
//! - [`pdf`]: PDF text and metadata extraction with [`lopdf`], falling back
//!   to `pdf-extract`
//! - [`text`]: decoding, whitespace cleanup, markup stripping and keyword
//!   splitting shared by every parser
//!
//! # PDF Extraction
//!
//! ```rust,no_run
//! use manuscript_parser::utils::extract_text;
//!
//! # fn example(bytes: &[u8]) -> Result<(), manuscript_parser::utils::PdfExtractError> {
//! let extracted = extract_text(bytes)?;
//! println!("{} pages, title {:?}", extracted.pages.len(), extracted.title);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod pdf;
pub mod text;

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
pub(crate) mod fixtures;

pub use pdf::{extract_text, ExtractedPdf, PdfExtractError};
pub use text::{clean_text, keywords_from_filename, split_keywords, strip_markup};
