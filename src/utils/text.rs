//! Text cleanup shared by the format parsers.

use regex::Regex;
use std::sync::LazyLock;

/// Words that never make useful keywords when derived from a file name
const FILENAME_STOP_WORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "for", "from", "file", "document", "paper", "research",
    "study", "draft",
];

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

// Closing tags (and <br>) of elements that end a line of text.
static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|h[1-6]|li|tr|div|title|section)\s*>|<br\s*/?>").expect("valid regex")
});

static CELL_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("valid regex"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"));

static INLINE_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

/// Strip a leading UTF-8 byte order mark
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Decode bytes as UTF-8, replacing invalid sequences.
///
/// Returns the text and whether any replacement happened.
pub fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        std::borrow::Cow::Borrowed(text) => (text.to_string(), false),
        std::borrow::Cow::Owned(text) => (text, true),
    }
}

/// BOM removed, line endings normalized to `\n`, surrounding whitespace trimmed
pub fn clean_text(text: &str) -> String {
    strip_bom(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// The first line with any non-whitespace content, trimmed
pub fn first_non_blank_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Decode the HTML/XML character entities that show up in converted markup
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "ndash" => Some('\u{2013}'),
                    "mdash" => Some('\u{2014}'),
                    "hellip" => Some('\u{2026}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Collapse runs of spaces within each line, trim lines and drop blank ones
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| INLINE_SPACE_RE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn HTML-like markup into plain text, one block element per line
pub fn strip_markup(markup: &str) -> String {
    let text = BLOCK_END_RE.replace_all(markup, "\n");
    let text = CELL_END_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, "");
    normalize_whitespace(&decode_entities(&text))
}

/// Split a keyword list on commas and semicolons, dropping empty entries
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split([',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive candidate keywords from a file stem such as `climate-model_results`
pub fn keywords_from_filename(stem: &str) -> Vec<String> {
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 3)
        .filter(|token| !FILENAME_STOP_WORDS.contains(&token.as_str()))
        .collect()
}
