//! Word (.docx) manuscripts.
//!
//! The WordprocessingML body is converted into lightweight HTML-like markup
//! first (headings, paragraphs, list items, tables), then flattened to text.
//! Conversion problems that do not stop the parse, such as paragraph styles
//! with no markup mapping, are collected as warnings.

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::models::{DocumentFormat, ParserOptions, RawDocument, StructuredDocument};
use crate::parsers::{structure_text, DocumentParser, ParseError};
use crate::utils::archive::{self, has_zip_signature};
use crate::utils::text::strip_markup;

const DOCUMENT_ENTRY: &str = "word/document.xml";
const STYLES_ENTRY: &str = "word/styles.xml";

/// Compound File Binary header used by legacy .doc files
const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Paragraph styles with a known markup mapping, compared by normalized name
const PLAIN_STYLES: &[&str] = &[
    "normal",
    "bodytext",
    "nospacing",
    "subtitle",
    "quote",
    "intensequote",
    "caption",
    "tableparagraph",
    "footnotetext",
    "endnotetext",
    "listparagraph",
    "listbullet",
    "listnumber",
];

/// Parser for Office Open XML word-processing documents
#[derive(Debug, Clone, Default)]
pub struct WordParser;

impl WordParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for WordParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Word
    }

    fn mime_types(&self) -> &'static [&'static str] {
        &[
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/msword",
        ]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["docx", "doc"]
    }

    fn parse(
        &self,
        raw: &RawDocument,
        options: &ParserOptions,
    ) -> Result<StructuredDocument, ParseError> {
        let bytes = raw.bytes();
        if bytes.starts_with(&OLE_SIGNATURE) {
            return Err(ParseError::Container(
                "legacy binary Word (.doc) documents are not supported; save as .docx".to_string(),
            ));
        }
        if !has_zip_signature(bytes) {
            return Err(ParseError::InvalidSignature("Word"));
        }

        let mut archive = archive::open_archive(bytes)?;
        let Some(document_entry) = archive::find_entry(&archive, DOCUMENT_ENTRY) else {
            return Err(ParseError::MissingContent(
                "Could not find document body in Word file".to_string(),
            ));
        };
        let document_xml = archive::read_entry_string(&mut archive, &document_entry)?;

        let style_names = match archive::find_entry(&archive, STYLES_ENTRY) {
            Some(entry) => {
                let styles_xml = archive::read_entry_string(&mut archive, &entry)?;
                // Style names only improve warning text; a broken styles part is not fatal
                parse_style_names(&styles_xml).unwrap_or_default()
            }
            None => HashMap::new(),
        };

        let conversion = convert_to_markup(&document_xml, &style_names)?;
        let text = strip_markup(&conversion.markup);

        let mut document = structure_text(&text, options);
        document.warnings.extend(conversion.warnings);

        tracing::debug!(
            file = raw.file_name(),
            chars = document.content.len(),
            warnings = document.warnings.len(),
            "Parsed Word document"
        );

        Ok(document)
    }
}

/// Markup produced from a WordprocessingML body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub markup: String,
    pub warnings: Vec<String>,
}

/// Map style ids to display names from `word/styles.xml`
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == b"style" => {
                current_id = attr_value(e, b"styleId");
            }
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (&current_id, attr_value(e, b"val")) {
                    names.insert(id.clone(), name);
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"style" => current_id = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

/// How a paragraph is rendered in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Paragraph,
    Heading(u8),
    ListItem,
}

impl Block {
    fn tag(&self) -> String {
        match self {
            Block::Paragraph => "p".to_string(),
            Block::Heading(level) => format!("h{}", level),
            Block::ListItem => "li".to_string(),
        }
    }
}

/// Per-paragraph conversion state
#[derive(Debug, Default)]
struct ParagraphState {
    style_id: Option<String>,
    numbered: bool,
    text: String,
}

/// Convert a WordprocessingML body into HTML-like markup
pub fn convert_to_markup(
    xml: &str,
    style_names: &HashMap<String, String>,
) -> Result<Conversion, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut conversion = Conversion::default();
    let mut warned: HashSet<String> = HashSet::new();

    let mut paragraph: Option<ParagraphState> = None;
    let mut in_text = false;
    let mut run_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => paragraph = Some(ParagraphState::default()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                b"tbl" => conversion.markup.push_str("<table>"),
                b"tr" => conversion.markup.push_str("<tr>"),
                b"tc" => conversion.markup.push_str("<td>"),
                b"pStyle" | b"numPr" => {
                    apply_paragraph_property(e, paragraph.as_mut());
                }
                b"drawing" | b"pict" | b"object" => {
                    warn_once(
                        &mut conversion.warnings,
                        &mut warned,
                        embedded_object_warning(e),
                    );
                }
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"pStyle" | b"numPr" => apply_paragraph_property(e, paragraph.as_mut()),
                b"tab" if run_depth > 0 => push_text(paragraph.as_mut(), "\t"),
                b"br" | b"cr" if run_depth > 0 => push_text(paragraph.as_mut(), "<br/>"),
                _ => {}
            },
            Event::Text(ref t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ParseError::Decode(format!("XML: {}", e)))?;
                push_text(paragraph.as_mut(), &escape_markup(&text));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"p" => {
                    if let Some(state) = paragraph.take() {
                        let block = classify_paragraph(&state, style_names, |warning| {
                            warn_once(&mut conversion.warnings, &mut warned, warning)
                        });
                        if !state.text.trim().is_empty() {
                            let tag = block.tag();
                            conversion
                                .markup
                                .push_str(&format!("<{tag}>{}</{tag}>", state.text));
                        }
                    }
                }
                b"tc" => conversion.markup.push_str("</td>"),
                b"tr" => conversion.markup.push_str("</tr>"),
                b"tbl" => conversion.markup.push_str("</table>"),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(conversion)
}

fn apply_paragraph_property(element: &BytesStart<'_>, paragraph: Option<&mut ParagraphState>) {
    let Some(paragraph) = paragraph else {
        return;
    };
    match element.local_name().as_ref() {
        b"pStyle" => paragraph.style_id = attr_value(element, b"val"),
        b"numPr" => paragraph.numbered = true,
        _ => {}
    }
}

fn push_text(paragraph: Option<&mut ParagraphState>, text: &str) {
    if let Some(paragraph) = paragraph {
        paragraph.text.push_str(text);
    }
}

/// Decide the markup block for a finished paragraph, reporting styles that
/// have no mapping
fn classify_paragraph(
    state: &ParagraphState,
    style_names: &HashMap<String, String>,
    mut warn: impl FnMut(String),
) -> Block {
    let Some(style_id) = &state.style_id else {
        return if state.numbered {
            Block::ListItem
        } else {
            Block::Paragraph
        };
    };

    let name = style_names
        .get(style_id)
        .cloned()
        .unwrap_or_else(|| style_id.clone());
    let normalized: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    if normalized == "title" {
        return Block::Heading(1);
    }
    if let Some(level) = normalized
        .strip_prefix("heading")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=6).contains(n))
    {
        return Block::Heading(level);
    }
    if normalized.starts_with("list") || state.numbered {
        return Block::ListItem;
    }
    if !PLAIN_STYLES.contains(&normalized.as_str()) {
        warn(format!(
            "Unrecognised paragraph style: '{}' (Style ID: {})",
            name, style_id
        ));
    }
    Block::Paragraph
}

fn embedded_object_warning(element: &BytesStart<'_>) -> String {
    let kind = match element.local_name().as_ref() {
        b"drawing" | b"pict" => "image",
        _ => "embedded object",
    };
    format!("Unsupported content skipped: {}", kind)
}

fn warn_once(warnings: &mut Vec<String>, seen: &mut HashSet<String>, warning: String) {
    if seen.insert(warning.clone()) {
        warnings.push(warning);
    }
}

/// Value of an attribute, matched on its local name (`w:val` matches `val`)
fn attr_value(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
