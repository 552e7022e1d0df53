//! Apple Pages manuscripts.
//!
//! A `.pages` file is a zip container. Older exports carry the text as XML
//! (`document.xml` or `index.xml`); most carry a rendered preview at
//! `QuickLook/Preview.pdf`, which is used as a lower-fidelity fallback.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};
use crate::parsers::{structure_text, DocumentParser, ParseError, PdfParser};
use crate::utils::archive::{self, has_zip_signature, MemoryArchive};
use crate::utils::pdf;
use crate::utils::text::{first_non_blank_line, normalize_whitespace, strip_markup};

/// Content entries in priority order
const XML_ENTRIES: &[&str] = &["document.xml", "index.xml"];
const PREVIEW_ENTRY: &str = "QuickLook/Preview.pdf";

/// Elements whose end starts a new line of text
const LINE_ELEMENTS: &[&[u8]] = &[
    b"p", b"para", b"paragraph", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6", b"li", b"br",
    b"section", b"title", b"row", b"cell", b"text-body",
];

pub(crate) const PREVIEW_WARNING: &str =
    "Text was extracted from the embedded preview PDF; text fidelity may be reduced";

/// Parser for Apple Pages documents
#[derive(Debug, Clone, Default)]
pub struct PagesParser;

impl PagesParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_preview(
        archive: &mut MemoryArchive<'_>,
        entry: &str,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        tracing::info!("Pages document has no XML content, using preview PDF");
        let preview = archive::read_entry_bytes(archive, entry)?;

        let mut document = match pdf::extract_text(&preview) {
            Ok(extracted) => {
                let mut document = PdfParser::build_document(extracted, options);
                // The preview's metadata describes the rendering, not the manuscript
                if options.extract_title {
                    document.title = first_non_blank_line(&document.content);
                }
                document
            }
            Err(e) => {
                tracing::warn!("Preview PDF could not be decoded: {}", e);
                let mut document = StructuredDocument::new(String::new());
                document.warn(format!("Preview PDF could not be decoded: {}", e));
                document
            }
        };

        document.warnings.insert(0, PREVIEW_WARNING.to_string());
        Ok(document)
    }
}

impl DocumentParser for PagesParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pages
    }

    fn mime_types(&self) -> &'static [&'static str] {
        &[
            "application/vnd.apple.pages",
            "application/x-iwork-pages-sffpages",
        ]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pages"]
    }

    fn parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        let bytes = raw.bytes();
        if !has_zip_signature(bytes) {
            return Err(ParseError::InvalidSignature("Pages"));
        }

        let mut archive = archive::open_archive(bytes)?;

        for candidate in XML_ENTRIES {
            if let Some(entry) = archive::find_entry(&archive, candidate) {
                tracing::debug!(entry = entry.as_str(), "Reading Pages XML content");
                let xml = archive::read_entry_string(&mut archive, &entry)?;
                let (text, warning) = match xml_to_text(&xml) {
                    Ok(text) => (text, None),
                    Err(e) => (
                        strip_markup(&xml),
                        Some(format!("Pages XML is malformed ({}); tags were stripped", e)),
                    ),
                };
                let mut document = structure_text(&text, options);
                document.warnings.extend(warning);
                return Ok(document);
            }
        }

        if let Some(entry) = archive::find_entry(&archive, PREVIEW_ENTRY) {
            return Self::parse_preview(&mut archive, &entry, options);
        }

        let mut message = "Could not find content in Pages document".to_string();
        if archive::any_entry(&archive, |name| name.ends_with(".iwa")) {
            message.push_str(" (iWork archive format without a preview is not supported)");
        }
        Err(ParseError::MissingContent(message))
    }
}

/// Collect the text nodes of a Pages XML part, one line per block element
fn xml_to_text(xml: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(ref t) => {
                let chunk = t
                    .unescape()
                    .map_err(|e| ParseError::Decode(format!("XML: {}", e)))?;
                text.push_str(&chunk);
            }
            Event::CData(ref c) => text.push_str(&String::from_utf8_lossy(c)),
            Event::End(ref e) if LINE_ELEMENTS.contains(&e.local_name().as_ref()) => {
                text.push('\n');
            }
            Event::Empty(ref e) if LINE_ELEMENTS.contains(&e.local_name().as_ref()) => {
                text.push('\n');
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(normalize_whitespace(&text))
}
