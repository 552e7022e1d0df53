//! Input-side models: the raw upload and the options a parse runs with.

use serde::{Deserialize, Serialize};

/// MIME types that say nothing about the real format of a file.
///
/// When one of these is declared, parsers fall back to the file extension.
const GENERIC_MIME_TYPES: &[&str] = &[
    "application/octet-stream",
    "binary/octet-stream",
    "application/zip",
    "application/x-zip-compressed",
];

/// The file formats this crate knows how to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Word,
    Pdf,
    Pages,
}

impl DocumentFormat {
    /// Returns the display name of the format
    pub fn name(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "Plain Text",
            DocumentFormat::Word => "Microsoft Word",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Pages => "Apple Pages",
        }
    }

    /// Returns the short identifier of the format
    pub fn id(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "text",
            DocumentFormat::Word => "word",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Pages => "pages",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An uploaded file, exactly as it arrived at the boundary.
///
/// The declared MIME type comes from the uploader and may be missing or wrong.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    mime_type: Option<String>,
    file_name: String,
}

impl RawDocument {
    /// Create a raw document from its bytes, declared MIME type and file name
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        mime_type: Option<impl Into<String>>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.map(Into::into),
            file_name: file_name.into(),
        }
    }

    /// Create a raw document with no declared MIME type
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self::new(bytes, None::<String>, file_name)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The declared MIME type, lower-cased and without parameters
    /// (`text/plain; charset=utf-8` becomes `text/plain`)
    pub fn mime_type(&self) -> Option<String> {
        self.mime_type
            .as_deref()
            .map(|m| m.split(';').next().unwrap_or_default().trim().to_lowercase())
            .filter(|m| !m.is_empty())
    }

    /// Whether the declared MIME type is absent or carries no format information
    pub fn is_generic_mime(&self) -> bool {
        match self.mime_type() {
            Some(mime) => GENERIC_MIME_TYPES.contains(&mime.as_str()),
            None => true,
        }
    }

    /// The lower-cased file extension, if the file name has one
    pub fn extension(&self) -> Option<String> {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    /// The file name without directories and without its extension
    pub fn file_stem(&self) -> &str {
        let name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Best description of the file type for error messages:
    /// the extension if there is one, else the MIME type
    pub fn type_label(&self) -> String {
        self.extension()
            .or_else(|| self.mime_type())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Options that control a single parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    /// Whether the parser-native title should be honored
    #[serde(default = "default_true")]
    pub extract_title: bool,

    /// Request the external enhancement step
    #[serde(default, rename = "enhanceWithAI", alias = "enhanceWithAi")]
    pub enhance_with_ai: bool,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the title should be extracted
    pub fn extract_title(mut self, extract: bool) -> Self {
        self.extract_title = extract;
        self
    }

    /// Set whether enhancement is requested
    pub fn enhance_with_ai(mut self, enhance: bool) -> Self {
        self.enhance_with_ai = enhance;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            extract_title: true,
            enhance_with_ai: false,
        }
    }
}

fn default_true() -> bool {
    true
}
